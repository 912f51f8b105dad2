//! Configuration profiles and their policies
//!
//! A profile bundles optional policy sections. For editing, every present
//! section is flattened into `section.field` form fields and applied back with
//! validation.

use super::form::{parse_bool, parse_list, parse_number, yes_no, FormError, FormField};
use super::platform::Platform;
use crate::grid::GridRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasscodePolicy {
    pub min_length: u32,
    pub require_alphanumeric: bool,
    pub max_failed_attempts: u32,
    pub expiry_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WifiPolicy {
    pub ssid: String,
    pub security: String,
    pub auto_join: bool,
    pub hidden_network: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailPolicy {
    pub account_name: String,
    pub email: String,
    pub host: String,
    pub port: u16,
    pub use_ssl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestrictionsPolicy {
    pub allow_camera: bool,
    pub allow_screen_capture: bool,
    pub allow_app_install: bool,
    pub allow_usb_storage: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPolicy {
    pub show_previews: bool,
    pub sound_enabled: bool,
    pub badges_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockScreenPolicy {
    pub message: String,
    pub show_owner_info: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationsPolicy {
    pub required: Vec<String>,
    pub blocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePolicies {
    pub passcode: Option<PasscodePolicy>,
    pub wifi: Option<WifiPolicy>,
    pub mail: Option<MailPolicy>,
    pub restrictions: Option<RestrictionsPolicy>,
    pub notifications: Option<NotificationPolicy>,
    pub lock_screen: Option<LockScreenPolicy>,
    pub applications: Option<ApplicationsPolicy>,
}

/// A named bundle of device configuration policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_devices: u32,
    #[serde(default)]
    pub policies: ProfilePolicies,
}

impl GridRecord for Profile {
    fn record_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

impl Profile {
    /// Names of the policy sections this profile configures
    pub fn policy_summary(&self) -> Vec<&'static str> {
        let p = &self.policies;
        let mut sections = Vec::new();
        if p.passcode.is_some() {
            sections.push("passcode");
        }
        if p.wifi.is_some() {
            sections.push("wifi");
        }
        if p.mail.is_some() {
            sections.push("mail");
        }
        if p.restrictions.is_some() {
            sections.push("restrictions");
        }
        if p.notifications.is_some() {
            sections.push("notifications");
        }
        if p.lock_screen.is_some() {
            sections.push("lock_screen");
        }
        if p.applications.is_some() {
            sections.push("applications");
        }
        sections
    }

    /// Flatten the profile into editable fields
    pub fn form_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::new("name", "Name", self.name.clone()).required(),
            FormField::new("description", "Description", self.description.clone()),
        ];
        let p = &self.policies;

        if let Some(passcode) = &p.passcode {
            fields.push(FormField::new(
                "passcode.min_length",
                "Passcode min length",
                passcode.min_length.to_string(),
            ));
            fields.push(FormField::new(
                "passcode.require_alphanumeric",
                "Passcode alphanumeric",
                yes_no(passcode.require_alphanumeric),
            ));
            fields.push(FormField::new(
                "passcode.max_failed_attempts",
                "Max failed attempts",
                passcode.max_failed_attempts.to_string(),
            ));
            fields.push(FormField::new(
                "passcode.expiry_days",
                "Passcode expiry (days)",
                passcode.expiry_days.map(|d| d.to_string()).unwrap_or_default(),
            ));
        }
        if let Some(wifi) = &p.wifi {
            fields.push(FormField::new("wifi.ssid", "WiFi SSID", wifi.ssid.clone()));
            fields.push(FormField::new("wifi.security", "WiFi security", wifi.security.clone()));
            fields.push(FormField::new("wifi.auto_join", "WiFi auto join", yes_no(wifi.auto_join)));
            fields.push(FormField::new(
                "wifi.hidden_network",
                "WiFi hidden network",
                yes_no(wifi.hidden_network),
            ));
        }
        if let Some(mail) = &p.mail {
            fields.push(FormField::new("mail.account_name", "Mail account", mail.account_name.clone()));
            fields.push(FormField::new("mail.email", "Mail address", mail.email.clone()));
            fields.push(FormField::new("mail.host", "Mail host", mail.host.clone()));
            fields.push(FormField::new("mail.port", "Mail port", mail.port.to_string()));
            fields.push(FormField::new("mail.use_ssl", "Mail SSL", yes_no(mail.use_ssl)));
        }
        if let Some(r) = &p.restrictions {
            fields.push(FormField::new("restrictions.allow_camera", "Allow camera", yes_no(r.allow_camera)));
            fields.push(FormField::new(
                "restrictions.allow_screen_capture",
                "Allow screen capture",
                yes_no(r.allow_screen_capture),
            ));
            fields.push(FormField::new(
                "restrictions.allow_app_install",
                "Allow app install",
                yes_no(r.allow_app_install),
            ));
            fields.push(FormField::new(
                "restrictions.allow_usb_storage",
                "Allow USB storage",
                yes_no(r.allow_usb_storage),
            ));
        }
        if let Some(n) = &p.notifications {
            fields.push(FormField::new(
                "notifications.show_previews",
                "Notification previews",
                yes_no(n.show_previews),
            ));
            fields.push(FormField::new(
                "notifications.sound_enabled",
                "Notification sound",
                yes_no(n.sound_enabled),
            ));
            fields.push(FormField::new(
                "notifications.badges_enabled",
                "Notification badges",
                yes_no(n.badges_enabled),
            ));
        }
        if let Some(lock) = &p.lock_screen {
            fields.push(FormField::new("lock_screen.message", "Lock screen message", lock.message.clone()));
            fields.push(FormField::new(
                "lock_screen.show_owner_info",
                "Show owner info",
                yes_no(lock.show_owner_info),
            ));
        }
        if let Some(apps) = &p.applications {
            fields.push(FormField::new("applications.required", "Required apps", apps.required.join(", ")));
            fields.push(FormField::new("applications.blocked", "Blocked apps", apps.blocked.join(", ")));
        }

        fields
    }

    /// Apply edited fields to a copy of this profile.
    ///
    /// Nothing is applied when any field fails validation.
    pub fn apply_fields(&self, fields: &[FormField]) -> Result<Profile, FormError> {
        super::form::check_required(fields)?;
        let mut updated = self.clone();
        for field in fields {
            updated.apply_field(&field.key, &field.value)?;
        }
        Ok(updated)
    }

    fn apply_field(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        let unknown = || FormError::UnknownField(key.to_string());
        let (section, name) = match key.split_once('.') {
            Some(parts) => parts,
            None => {
                match key {
                    "name" => self.name = value.trim().to_string(),
                    "description" => self.description = value.trim().to_string(),
                    _ => return Err(unknown()),
                }
                return Ok(());
            }
        };
        let p = &mut self.policies;

        match section {
            "passcode" => {
                let passcode = p.passcode.as_mut().ok_or_else(unknown)?;
                match name {
                    "min_length" => {
                        let len: u32 = parse_number(key, value)?;
                        if !(4..=64).contains(&len) {
                            return Err(FormError::OutOfRange {
                                field: key.to_string(),
                                reason: "must be between 4 and 64".to_string(),
                            });
                        }
                        passcode.min_length = len;
                    }
                    "require_alphanumeric" => passcode.require_alphanumeric = parse_bool(key, value)?,
                    "max_failed_attempts" => passcode.max_failed_attempts = parse_number(key, value)?,
                    "expiry_days" => {
                        passcode.expiry_days = if value.trim().is_empty() {
                            None
                        } else {
                            Some(parse_number(key, value)?)
                        }
                    }
                    _ => return Err(unknown()),
                }
            }
            "wifi" => {
                let wifi = p.wifi.as_mut().ok_or_else(unknown)?;
                match name {
                    "ssid" => wifi.ssid = value.trim().to_string(),
                    "security" => wifi.security = value.trim().to_string(),
                    "auto_join" => wifi.auto_join = parse_bool(key, value)?,
                    "hidden_network" => wifi.hidden_network = parse_bool(key, value)?,
                    _ => return Err(unknown()),
                }
            }
            "mail" => {
                let mail = p.mail.as_mut().ok_or_else(unknown)?;
                match name {
                    "account_name" => mail.account_name = value.trim().to_string(),
                    "email" => mail.email = value.trim().to_string(),
                    "host" => mail.host = value.trim().to_string(),
                    "port" => mail.port = parse_number(key, value)?,
                    "use_ssl" => mail.use_ssl = parse_bool(key, value)?,
                    _ => return Err(unknown()),
                }
            }
            "restrictions" => {
                let r = p.restrictions.as_mut().ok_or_else(unknown)?;
                let flag = parse_bool(key, value)?;
                match name {
                    "allow_camera" => r.allow_camera = flag,
                    "allow_screen_capture" => r.allow_screen_capture = flag,
                    "allow_app_install" => r.allow_app_install = flag,
                    "allow_usb_storage" => r.allow_usb_storage = flag,
                    _ => return Err(unknown()),
                }
            }
            "notifications" => {
                let n = p.notifications.as_mut().ok_or_else(unknown)?;
                let flag = parse_bool(key, value)?;
                match name {
                    "show_previews" => n.show_previews = flag,
                    "sound_enabled" => n.sound_enabled = flag,
                    "badges_enabled" => n.badges_enabled = flag,
                    _ => return Err(unknown()),
                }
            }
            "lock_screen" => {
                let lock = p.lock_screen.as_mut().ok_or_else(unknown)?;
                match name {
                    "message" => lock.message = value.trim().to_string(),
                    "show_owner_info" => lock.show_owner_info = parse_bool(key, value)?,
                    _ => return Err(unknown()),
                }
            }
            "applications" => {
                let apps = p.applications.as_mut().ok_or_else(unknown)?;
                match name {
                    "required" => apps.required = parse_list(value),
                    "blocked" => apps.blocked = parse_list(value),
                    _ => return Err(unknown()),
                }
            }
            _ => return Err(unknown()),
        }
        Ok(())
    }
}
