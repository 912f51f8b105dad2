//! Fleet overview derived from the device list

use super::device::{Device, DeviceStatus};
use super::platform::Platform;
use std::collections::BTreeMap;

/// Counts shown on the dashboard tab
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub total: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_platform: Vec<(Platform, usize)>,
    pub compliant: usize,
    /// Devices reporting a battery level below 20%
    pub low_battery: usize,
}

impl DashboardSummary {
    pub fn from_devices(devices: &[Device]) -> Self {
        let mut by_status: BTreeMap<&'static str, usize> = BTreeMap::new();
        for status in DeviceStatus::all() {
            by_status.insert(status.label(), 0);
        }
        for device in devices {
            *by_status.entry(device.status.label()).or_default() += 1;
        }

        let by_platform = Platform::all()
            .into_iter()
            .map(|p| (p, devices.iter().filter(|d| d.platform == p).count()))
            .collect();

        Self {
            total: devices.len(),
            by_status,
            by_platform,
            compliant: devices.iter().filter(|d| d.compliant).count(),
            low_battery: devices
                .iter()
                .filter(|d| d.battery_level.is_some_and(|b| b < 20))
                .count(),
        }
    }

    /// Share of compliant devices in percent, `None` for an empty fleet
    pub fn compliance_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.compliant as f64 * 100.0 / self.total as f64)
        }
    }

    pub fn status_count(&self, status: DeviceStatus) -> usize {
        self.by_status.get(status.label()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(platform: Platform, status: DeviceStatus, compliant: bool, battery: Option<u8>) -> Device {
        Device {
            id: format!("{:?}-{:?}", platform, status),
            name: "d".to_string(),
            platform,
            model: String::new(),
            os_version: String::new(),
            owner: String::new(),
            status,
            compliant,
            battery_level: battery,
            last_seen: None,
            group_id: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let devices = vec![
            device(Platform::Android, DeviceStatus::Online, true, Some(80)),
            device(Platform::Android, DeviceStatus::Offline, false, Some(5)),
            device(Platform::Ios, DeviceStatus::Online, true, None),
            device(Platform::Linux, DeviceStatus::Lost, true, Some(19)),
        ];
        let summary = DashboardSummary::from_devices(&devices);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.status_count(DeviceStatus::Online), 2);
        assert_eq!(summary.status_count(DeviceStatus::Pending), 0);
        assert_eq!(summary.by_platform[0], (Platform::Android, 2));
        assert_eq!(summary.low_battery, 2);
        assert_eq!(summary.compliance_rate(), Some(75.0));
    }

    #[test]
    fn test_empty_fleet() {
        let summary = DashboardSummary::from_devices(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.compliance_rate(), None);
        assert_eq!(summary.by_platform.len(), 5);
    }
}
