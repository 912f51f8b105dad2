//! Column sets for each resource grid
//!
//! Device column keys double as the backend's sort and filter parameter
//! names, since the devices grid is paginated on the server.

use crate::grid::{Align, Column};
use crate::model::form::yes_no;
use crate::model::{Device, DeviceGroup, Geofence, Profile, Repository};
use chrono::{SecondsFormat, Utc};

pub fn device_columns() -> Vec<Column<Device>> {
    vec![
        Column::new("name", "Name", |d: &Device| (&d.name).into())
            .width(22)
            .min_width(8),
        Column::new("status", "Status", |d: &Device| d.status.label().into())
            .render_with(|d: &Device| format!("{} {}", d.status.icon(), d.status))
            .width(10)
            .filterable(),
        Column::new("model", "Model", |d: &Device| (&d.model).into()).width(18),
        Column::new("osVersion", "OS", |d: &Device| (&d.os_version).into()).width(8),
        Column::new("owner", "Owner", |d: &Device| (&d.owner).into()).width(16),
        Column::new("compliant", "Compliant", |d: &Device| d.compliant.into())
            .render_with(|d: &Device| yes_no(d.compliant).to_string())
            .align(Align::Center)
            .filterable(),
        Column::new("batteryLevel", "Battery", |d: &Device| {
            d.battery_level.map(u32::from).into()
        })
        .render_with(|d: &Device| {
            d.battery_level
                .map(|b| format!("{}%", b))
                .unwrap_or_default()
        })
        .align(Align::Right)
        .unsearchable(),
        Column::new("lastSeen", "Last seen", |d: &Device| {
            d.last_seen
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .into()
        })
        .render_with(|d: &Device| d.last_seen_label(Utc::now()))
        .width(11)
        .unsearchable(),
        Column::new("groupId", "Group", |d: &Device| d.group_id.clone().into())
            .hidden()
            .filterable(),
        Column::new("id", "ID", |d: &Device| (&d.id).into())
            .width(12)
            .hidden(),
    ]
}

pub fn profile_columns() -> Vec<Column<Profile>> {
    vec![
        Column::new("name", "Name", |p: &Profile| (&p.name).into())
            .width(24)
            .min_width(8),
        Column::new("description", "Description", |p: &Profile| {
            (&p.description).into()
        })
        .width(30)
        .max_width(80),
        Column::new("policies", "Policies", |p: &Profile| {
            p.policy_summary().join(", ").into()
        })
        .width(30)
        .unsortable(),
        Column::new("assignedDevices", "Devices", |p: &Profile| {
            p.assigned_devices.into()
        })
        .align(Align::Right)
        .unsearchable(),
        Column::new("id", "ID", |p: &Profile| (&p.id).into())
            .width(12)
            .hidden(),
    ]
}

pub fn group_columns() -> Vec<Column<DeviceGroup>> {
    vec![
        Column::new("name", "Name", |g: &DeviceGroup| (&g.name).into())
            .width(24)
            .min_width(8),
        Column::new("description", "Description", |g: &DeviceGroup| {
            (&g.description).into()
        })
        .width(40),
        Column::new("deviceCount", "Devices", |g: &DeviceGroup| {
            g.device_count.into()
        })
        .align(Align::Right)
        .unsearchable(),
        Column::new("id", "ID", |g: &DeviceGroup| (&g.id).into())
            .width(12)
            .hidden(),
    ]
}

pub fn geofence_columns() -> Vec<Column<Geofence>> {
    vec![
        Column::new("name", "Name", |g: &Geofence| (&g.name).into())
            .width(24)
            .min_width(8),
        Column::new("latitude", "Latitude", |g: &Geofence| g.latitude.into())
            .render_with(|g: &Geofence| format!("{:.5}", g.latitude))
            .align(Align::Right)
            .unsearchable(),
        Column::new("longitude", "Longitude", |g: &Geofence| g.longitude.into())
            .render_with(|g: &Geofence| format!("{:.5}", g.longitude))
            .width(11)
            .align(Align::Right)
            .unsearchable(),
        Column::new("radius", "Radius (m)", |g: &Geofence| {
            g.radius_meters.into()
        })
        .align(Align::Right)
        .unsearchable(),
        Column::new("description", "Description", |g: &Geofence| {
            (&g.description).into()
        })
        .width(30),
        Column::new("id", "ID", |g: &Geofence| (&g.id).into())
            .width(12)
            .hidden(),
    ]
}

pub fn repository_columns() -> Vec<Column<Repository>> {
    vec![
        Column::new("name", "Name", |r: &Repository| (&r.name).into())
            .width(22)
            .min_width(8),
        Column::new("url", "URL", |r: &Repository| (&r.url).into())
            .width(40)
            .min_width(10),
        Column::new("kind", "Kind", |r: &Repository| (&r.kind).into())
            .width(8)
            .filterable(),
        Column::new("enabled", "Enabled", |r: &Repository| r.enabled.into())
            .render_with(|r: &Repository| yes_no(r.enabled).to_string())
            .align(Align::Center)
            .filterable(),
        Column::new("id", "ID", |r: &Repository| (&r.id).into())
            .width(12)
            .hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DataGrid;

    #[test]
    fn test_device_columns_sort_last_seen_chronologically() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[
                {"id": "a", "name": "a", "lastSeen": "2026-10-01T12:00:00Z"},
                {"id": "b", "name": "b"},
                {"id": "c", "name": "c", "lastSeen": "2026-09-01T08:30:00Z"}
            ]"#,
        )
        .unwrap();
        let mut grid = DataGrid::new(device_columns(), 10);
        grid.set_records(devices);
        grid.set_sort("lastSeen");

        let ids: Vec<&str> = grid.page_rows().into_iter().map(|d| d.id.as_str()).collect();
        // Empty prints as "" and sorts first
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_device_status_filter_uses_raw_label() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[{"id": "a", "name": "a", "status": "online"}, {"id": "b", "name": "b", "status": "lost"}]"#,
        )
        .unwrap();
        let mut grid = DataGrid::new(device_columns(), 10);
        grid.set_records(devices);

        assert_eq!(grid.filter_options("status"), vec!["lost", "online"]);
        grid.set_column_filter("status", "lost");
        assert_eq!(grid.total_rows(), 1);
    }

    #[test]
    fn test_hidden_by_default() {
        let grid = DataGrid::new(group_columns(), 10);
        let keys: Vec<&str> = grid.visible_columns().into_iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "description", "deviceCount"]);
    }
}
