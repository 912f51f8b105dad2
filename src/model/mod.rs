//! Model layer - records returned by the backend and UI state types
//!
//! - `DomainState` - platform selection, dashboard data, request generations
//! - record types - devices, profiles, groups, geofences, repositories
//! - `ModalStack` - modal overlay management
//! - `Notifications` - transient status bar messages

pub mod dashboard;
pub mod device;
pub mod domain;
pub mod form;
pub mod geofence;
pub mod group;
pub mod modal;
pub mod notification;
pub mod platform;
pub mod profile;
pub mod repository;
pub mod ui;

// Re-export commonly used types
pub use dashboard::DashboardSummary;
pub use device::{Device, DeviceStatus};
pub use form::{FormError, FormField};
pub use geofence::{Geofence, NewGeofence};
pub use group::{DeviceGroup, NewDeviceGroup};
pub use platform::Platform;
pub use profile::Profile;
pub use repository::{NewRepository, Repository};
