//! UI enums shared by components

/// Resource tab on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Devices,
    Profiles,
    Groups,
    Geofences,
    Repository,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![
            Tab::Dashboard,
            Tab::Devices,
            Tab::Profiles,
            Tab::Groups,
            Tab::Geofences,
            Tab::Repository,
        ]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Devices => "Devices",
            Tab::Profiles => "Profiles",
            Tab::Groups => "Groups",
            Tab::Geofences => "Geofences",
            Tab::Repository => "Repository",
        }
    }

    /// Whether the REST endpoint for this tab is scoped by platform
    pub fn is_platform_scoped(&self) -> bool {
        matches!(self, Tab::Devices | Tab::Profiles | Tab::Repository)
    }

    /// Whether records can be created from this tab
    pub fn supports_create(&self) -> bool {
        matches!(self, Tab::Groups | Tab::Geofences | Tab::Repository)
    }

    pub fn supports_delete(&self) -> bool {
        self.supports_create()
    }

    pub fn next(&self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn previous(&self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Setup,
    Running,
}
