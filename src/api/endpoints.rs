//! Typed calls for each backend resource

use super::client::ApiClient;
use super::error::ApiError;
use super::page::{query_params, ListResponse, Page};
use crate::grid::GridQuery;
use crate::model::{
    Device, DeviceGroup, Geofence, NewDeviceGroup, NewGeofence, NewRepository, Platform, Profile,
    Repository,
};

/// Page size used when walking every page of a device query
pub const BULK_PAGE_SIZE: usize = 500;

impl ApiClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Devices
    // ─────────────────────────────────────────────────────────────────────────

    /// One server-side page of devices for the given query
    pub fn list_devices(&self, platform: Platform, query: &GridQuery) -> Result<Page<Device>, ApiError> {
        self.get_json(&[platform.path_segment(), "devices"], &query_params(query))
    }

    /// Every device on a platform
    pub fn all_devices(&self, platform: Platform) -> Result<Vec<Device>, ApiError> {
        self.matching_devices(platform, &GridQuery::default())
    }

    /// Every device matching the query's search, filters and sort, walking
    /// pages until `total` is reached. The query's own paging is ignored.
    pub fn matching_devices(
        &self,
        platform: Platform,
        query: &GridQuery,
    ) -> Result<Vec<Device>, ApiError> {
        let mut devices = Vec::new();
        let mut query = GridQuery {
            page: 1,
            page_size: BULK_PAGE_SIZE,
            ..query.clone()
        };

        loop {
            let page = self.list_devices(platform, &query)?;
            let total = page.total_rows();
            let fetched = page.data.len();
            devices.extend(page.data);
            if fetched == 0 || devices.len() >= total {
                break;
            }
            query.page += 1;
        }

        Ok(devices)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Profiles
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_profiles(&self, platform: Platform) -> Result<Vec<Profile>, ApiError> {
        let list: ListResponse<Profile> =
            self.get_json(&[platform.path_segment(), "profiles"], &[])?;
        Ok(list.into_vec())
    }

    pub fn get_profile(&self, platform: Platform, id: &str) -> Result<Profile, ApiError> {
        self.get_json(&[platform.path_segment(), "profiles", id], &[])
    }

    /// The saved profile; the submitted one when the backend answers with no body
    pub fn update_profile(&self, platform: Platform, profile: &Profile) -> Result<Profile, ApiError> {
        let saved = self.put_json(&[platform.path_segment(), "profiles", &profile.id], profile)?;
        Ok(saved.unwrap_or_else(|| profile.clone()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Groups
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_groups(&self) -> Result<Vec<DeviceGroup>, ApiError> {
        let list: ListResponse<DeviceGroup> = self.get_json(&["groups"], &[])?;
        Ok(list.into_vec())
    }

    /// The created group, if the backend echoes it back
    pub fn create_group(&self, group: &NewDeviceGroup) -> Result<Option<DeviceGroup>, ApiError> {
        self.post_json(&["groups"], group)
    }

    pub fn delete_group(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["groups", id])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Geofences
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_geofences(&self) -> Result<Vec<Geofence>, ApiError> {
        let list: ListResponse<Geofence> = self.get_json(&["geofences"], &[])?;
        Ok(list.into_vec())
    }

    pub fn create_geofence(&self, geofence: &NewGeofence) -> Result<Option<Geofence>, ApiError> {
        self.post_json(&["geofences"], geofence)
    }

    pub fn delete_geofence(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["geofences", id])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repository
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_repositories(&self, platform: Platform) -> Result<Vec<Repository>, ApiError> {
        let list: ListResponse<Repository> =
            self.get_json(&[platform.path_segment(), "repository"], &[])?;
        Ok(list.into_vec())
    }

    pub fn add_repository(
        &self,
        platform: Platform,
        repository: &NewRepository,
    ) -> Result<Option<Repository>, ApiError> {
        self.post_json(&[platform.path_segment(), "repository"], repository)
    }

    pub fn delete_repository(&self, platform: Platform, id: &str) -> Result<(), ApiError> {
        self.delete(&[platform.path_segment(), "repository", id])
    }
}
