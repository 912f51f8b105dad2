//! Enrolled devices

use super::platform::Platform;
use crate::grid::GridRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Pending,
    Lost,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    pub fn all() -> [DeviceStatus; 5] {
        [
            DeviceStatus::Online,
            DeviceStatus::Offline,
            DeviceStatus::Pending,
            DeviceStatus::Lost,
            DeviceStatus::Unknown,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Pending => "pending",
            DeviceStatus::Lost => "lost",
            DeviceStatus::Unknown => "unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "●",
            DeviceStatus::Offline => "○",
            DeviceStatus::Pending => "◌",
            DeviceStatus::Lost => "✗",
            DeviceStatus::Unknown => "?",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A device enrolled in the management service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub compliant: bool,
    #[serde(default)]
    pub battery_level: Option<u8>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl Device {
    /// "2h ago" style age of the last check-in
    pub fn last_seen_label(&self, now: DateTime<Utc>) -> String {
        let Some(seen) = self.last_seen else {
            return "never".to_string();
        };
        let secs = (now - seen).num_seconds().max(0);
        match secs {
            0..=59 => "just now".to_string(),
            60..=3599 => format!("{}m ago", secs / 60),
            3600..=86_399 => format!("{}h ago", secs / 3600),
            _ => format!("{}d ago", secs / 86_400),
        }
    }
}

impl GridRecord for Device {
    fn record_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}
