//! Application state and logic
//!
//! The App struct is the root component that coordinates the resource grids,
//! dialogs and the background request runner.

use crate::action::Action;
use crate::api::ApiClient;
use crate::component::Component;
use crate::components::columns::{
    device_columns, geofence_columns, group_columns, profile_columns, repository_columns,
};
use crate::components::{
    draw_home_screen, ColumnFilterDialog, ColumnsDialog, ConfirmDeleteDialog, DashboardComponent,
    DetailComponent, ExportDialog, FormDialog, GridPanel, GridView, HelpDialog, HomeComponent,
    HomeRenderContext, QuitDialog, SetupComponent,
};
use crate::config::{Config, DEFAULT_PAGE_SIZE};
use crate::grid::{DataGrid, ExportFormat, GridQuery, ServerCallbacks};
use crate::model::domain::DomainState;
use crate::model::modal::{FormPurpose, Modal, ModalStack};
use crate::model::notification::Notifications;
use crate::model::ui::{AppMode, Tab};
use crate::model::{
    Device, DeviceGroup, DeviceStatus, FormField, Geofence, NewDeviceGroup, NewGeofence,
    NewRepository, Platform, Profile, Repository,
};
use crate::services::{Completed, CsvFileExporter, Payload, Request, RequestRunner};
use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info, warn};
use ratatui::{layout::Rect, Frame};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════════
// Grid Construction
// ═══════════════════════════════════════════════════════════════════════════════

/// The devices grid is paginated on the server. Its callbacks only signal
/// that the query changed; the app reads the query back from the grid when
/// it drains the channel.
fn devices_grid(page_size: usize) -> (GridView<Device>, Receiver<()>) {
    let (tx, rx) = mpsc::channel();
    let (page_tx, size_tx, query_tx) = (tx.clone(), tx.clone(), tx);
    let callbacks = ServerCallbacks {
        on_page_change: Some(Box::new(move |_: usize| {
            let _ = page_tx.send(());
        })),
        on_page_size_change: Some(Box::new(move |_: usize| {
            let _ = size_tx.send(());
        })),
        on_query_change: Some(Box::new(move |_: &GridQuery| {
            let _ = query_tx.send(());
        })),
    };

    let grid = DataGrid::new(device_columns(), page_size)
        .with_title("Devices")
        .with_empty_message("No devices enrolled on this platform")
        .server_driven(callbacks);
    let statuses = DeviceStatus::all()
        .iter()
        .map(|s| s.label().to_string())
        .collect();
    let view = GridView::new(grid)
        .with_filter_options("status", statuses)
        .with_filter_options("compliant", vec!["yes".to_string(), "no".to_string()])
        // Filled from the groups listing; a device page only shows its own groups
        .with_filter_options("groupId", Vec::new());
    (view, rx)
}

fn record_kind(tab: Tab) -> &'static str {
    match tab {
        Tab::Groups => "device group",
        Tab::Geofences => "geofence",
        Tab::Repository => "repository",
        Tab::Profiles => "profile",
        _ => "record",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Backend client, `None` until a valid config is known
    pub client: Option<ApiClient>,

    /// Domain state (platform, dashboard, request generations)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background request runner
    pub runner: RequestRunner,

    /// Status bar messages
    pub notifications: Notifications,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Signals from the devices grid that it needs a new server page
    page_requests: Receiver<()>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub detail: DetailComponent,
    pub dashboard: DashboardComponent,
    pub devices: GridView<Device>,
    pub profiles: GridView<Profile>,
    pub groups: GridView<DeviceGroup>,
    pub geofences: GridView<Geofence>,
    pub repositories: GridView<Repository>,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub column_filter_dialog: ColumnFilterDialog,
    pub columns_dialog: ColumnsDialog,
    pub export_dialog: ExportDialog,
    pub form_dialog: FormDialog,
    pub confirm_delete_dialog: Option<ConfirmDeleteDialog>,
    pub setup: SetupComponent,

    /// Server copy of the profile open in the edit form
    editing_profile: Option<Profile>,

    /// Active config
    pub config: Option<Config>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app from a loaded config, or start the setup wizard
    pub fn new(config: Option<Config>) -> App {
        let page_size = config
            .as_ref()
            .map(|c| c.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let mut app = Self::create_app(page_size);

        match config {
            Some(config) => {
                if let Err(e) = app.connect(config.clone()) {
                    warn!("Config rejected: {}", e);
                    app.setup = SetupComponent::with_config(config);
                }
            }
            None => info!("No config found, starting setup"),
        }
        app
    }

    fn create_app(page_size: usize) -> App {
        let (devices, page_requests) = devices_grid(page_size);
        App {
            mode: AppMode::Setup,
            client: None,
            domain: DomainState::default(),
            modals: ModalStack::new(),
            runner: RequestRunner::new(),
            notifications: Notifications::default(),
            should_quit: false,
            page_requests,
            // Components
            home: HomeComponent::new(),
            detail: DetailComponent::new(),
            dashboard: DashboardComponent::default(),
            devices,
            profiles: GridView::new(
                DataGrid::new(profile_columns(), page_size)
                    .with_title("Profiles")
                    .with_empty_message("No profiles on this platform"),
            ),
            groups: GridView::new(
                DataGrid::new(group_columns(), page_size)
                    .with_title("Device Groups")
                    .with_empty_message("No device groups. Press 'n' to create one."),
            ),
            geofences: GridView::new(
                DataGrid::new(geofence_columns(), page_size)
                    .with_title("Geofences")
                    .with_empty_message("No geofences. Press 'n' to create one."),
            ),
            repositories: GridView::new(
                DataGrid::new(repository_columns(), page_size)
                    .with_title("App Repository")
                    .with_empty_message("No repositories. Press 'n' to add one."),
            ),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            column_filter_dialog: ColumnFilterDialog::new(),
            columns_dialog: ColumnsDialog::new(),
            export_dialog: ExportDialog::default(),
            form_dialog: FormDialog::default(),
            confirm_delete_dialog: None,
            setup: SetupComponent::new(),
            editing_profile: None,
            config: None,
        }
    }

    /// Build the client and switch to the main screen
    fn connect(&mut self, config: Config) -> Result<()> {
        let client = ApiClient::new(
            &config.api_base_url,
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        info!(
            "Connected to {} (platform {}, token {})",
            client.base_url(),
            config.default_platform,
            if client.has_token() { "set" } else { "missing" }
        );

        self.client = Some(client);
        self.domain = DomainState::new(config.default_platform);
        self.register_exporters(&config);
        self.config = Some(config);
        self.mode = AppMode::Running;
        Ok(())
    }

    fn register_exporters(&mut self, config: &Config) {
        let dir = config.export_path();
        let csv = |resource: &str| Box::new(CsvFileExporter::new(dir.clone(), resource));
        self.devices.grid.set_exporter(ExportFormat::Csv, csv("devices"));
        self.profiles.grid.set_exporter(ExportFormat::Csv, csv("profiles"));
        self.groups.grid.set_exporter(ExportFormat::Csv, csv("device-groups"));
        self.geofences.grid.set_exporter(ExportFormat::Csv, csv("geofences"));
        self.repositories.grid.set_exporter(ExportFormat::Csv, csv("repositories"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grid Access
    // ─────────────────────────────────────────────────────────────────────────

    fn grid_for(&mut self, tab: Tab) -> Option<&mut dyn GridPanel> {
        match tab {
            Tab::Dashboard => None,
            Tab::Devices => Some(&mut self.devices),
            Tab::Profiles => Some(&mut self.profiles),
            Tab::Groups => Some(&mut self.groups),
            Tab::Geofences => Some(&mut self.geofences),
            Tab::Repository => Some(&mut self.repositories),
        }
    }

    fn active_grid(&mut self) -> Option<&mut dyn GridPanel> {
        self.grid_for(self.home.active_tab)
    }

    fn active_grid_ref(&self) -> Option<&dyn GridPanel> {
        match self.home.active_tab {
            Tab::Dashboard => None,
            Tab::Devices => Some(&self.devices),
            Tab::Profiles => Some(&self.profiles),
            Tab::Groups => Some(&self.groups),
            Tab::Geofences => Some(&self.geofences),
            Tab::Repository => Some(&self.repositories),
        }
    }

    fn set_tab_loading(&mut self, tab: Tab, loading: bool) {
        match self.grid_for(tab) {
            Some(grid) => grid.set_loading(loading),
            None => self.dashboard.set_loading(loading),
        }
    }

    /// Drop a tab's records, e.g. after the platform changed
    fn clear_tab(&mut self, tab: Tab) {
        match tab {
            Tab::Dashboard => {
                self.domain.dashboard = None;
                self.dashboard.set_summary(None);
            }
            Tab::Devices => self.devices.set_server_page(Vec::new(), 0),
            Tab::Profiles => self.profiles.set_records(Vec::new()),
            Tab::Groups => self.groups.set_records(Vec::new()),
            Tab::Geofences => self.geofences.set_records(Vec::new()),
            Tab::Repository => self.repositories.set_records(Vec::new()),
        }
        self.set_tab_loading(tab, false);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    fn listing_request(&self, tab: Tab) -> Request {
        match tab {
            Tab::Dashboard => Request::Dashboard,
            Tab::Devices => Request::Devices(self.devices.grid.query()),
            Tab::Profiles => Request::Profiles,
            Tab::Groups => Request::Groups,
            Tab::Geofences => Request::Geofences,
            Tab::Repository => Request::Repositories,
        }
    }

    /// Fetch a tab's data. Anything still in flight for the tab becomes stale.
    fn load_tab(&mut self, tab: Tab) {
        if self.client.is_none() {
            return;
        }
        let request = self.listing_request(tab);
        let generation = self.domain.bump_generation(tab);
        self.domain.start_loading(tab);
        self.set_tab_loading(tab, true);

        if let Some(client) = &self.client {
            self.runner
                .spawn(client, self.domain.platform, tab, generation, request);
        }

        // The devices group filter lists every group, not just those on the page
        if tab == Tab::Devices && self.domain.needs_load(Tab::Groups) {
            self.load_tab(Tab::Groups);
        }
    }

    fn load_if_needed(&mut self, tab: Tab) {
        if self.domain.needs_load(tab) {
            self.load_tab(tab);
        }
    }

    /// Run a request without invalidating the tab; the outcome arrives on a
    /// later tick tagged with the tab's current generation
    fn spawn_request(&mut self, tab: Tab, request: Request) {
        let Some(client) = &self.client else {
            self.notifications.error("Not connected");
            return;
        };
        info!("{}", request);
        let generation = self.domain.generation(tab);
        self.runner
            .spawn(client, self.domain.platform, tab, generation, request);
    }

    /// Reload a tab after a mutation, or mark it stale if it isn't visible
    fn refresh_tab(&mut self, tab: Tab) {
        if self.home.active_tab == tab {
            self.load_tab(tab);
        } else {
            self.domain.invalidate(tab);
        }
    }

    /// Page, page size or query of the devices grid changed
    fn drain_page_requests(&mut self) {
        if self.page_requests.try_iter().count() > 0 {
            self.refresh_tab(Tab::Devices);
        }
    }

    fn apply_completed(&mut self, completed: Completed) {
        let Completed {
            tab,
            generation,
            description,
            result,
        } = completed;
        let current = self.domain.is_current(tab, generation);

        match result {
            Ok(Payload::ProfileLoaded(profile)) => {
                if !current {
                    debug!("Dropping stale result: {} (gen {})", description, generation);
                    return;
                }
                self.open_profile_form(profile);
            }
            Ok(payload) if payload.is_listing() => {
                if !current {
                    debug!("Dropping stale result: {} (gen {})", description, generation);
                    return;
                }
                self.apply_listing(payload);
                self.domain.finish_loading(tab);
                self.set_tab_loading(tab, false);
            }
            Ok(payload) => self.apply_mutation(payload),
            Err(e) => {
                warn!("{} failed: {}", description, e);
                let message = if e.is_unauthorized() {
                    "Session expired / token rejected. Check the API token in the config."
                        .to_string()
                } else {
                    format!("Could not {}: {}", description, e)
                };
                self.notifications.error(message);
                if current {
                    self.domain.fail_loading(tab);
                    self.set_tab_loading(tab, false);
                }
            }
        }
    }

    fn apply_listing(&mut self, payload: Payload) {
        match payload {
            Payload::Dashboard(summary) => {
                self.dashboard.set_summary(Some(summary.clone()));
                self.domain.dashboard = Some(summary);
            }
            Payload::Devices(page) => {
                let total = page.total_rows();
                self.devices.set_server_page(page.data, total);
            }
            Payload::Profiles(profiles) => self.profiles.set_records(profiles),
            Payload::Groups(groups) => {
                let mut ids: Vec<String> = groups.iter().map(|g| g.id.clone()).collect();
                ids.sort();
                ids.dedup();
                self.devices.set_filter_options("groupId", ids);
                self.groups.set_records(groups);
            }
            Payload::Geofences(geofences) => self.geofences.set_records(geofences),
            Payload::Repositories(repositories) => self.repositories.set_records(repositories),
            other => debug!("Unexpected listing payload: {:?}", other),
        }
    }

    fn apply_mutation(&mut self, payload: Payload) {
        let tab = match payload {
            Payload::DeviceExport { format, devices } => {
                let outcome = self.devices.grid.export_records(format, &devices);
                self.report_export(outcome);
                return;
            }
            Payload::ProfileSaved(profile) => {
                self.notifications
                    .success(format!("Saved profile '{}'", profile.name));
                Tab::Profiles
            }
            Payload::Created { tab, name } => {
                self.notifications
                    .success(format!("Created {} '{}'", record_kind(tab), name));
                tab
            }
            Payload::Deleted { tab, id } => {
                self.notifications
                    .success(format!("Deleted {} {}", record_kind(tab), id));
                tab
            }
            other => {
                debug!("Unexpected mutation payload: {:?}", other);
                return;
            }
        };
        self.refresh_tab(tab);
        // Device counts on the dashboard may have moved
        if tab == Tab::Groups {
            self.domain.invalidate(Tab::Dashboard);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform
    // ─────────────────────────────────────────────────────────────────────────

    fn change_platform(&mut self, platform: Platform) {
        if platform == self.domain.platform {
            return;
        }
        info!("Platform changed to {}", platform);
        self.domain.platform = platform;

        for tab in Tab::all().into_iter().filter(|t| t.is_platform_scoped()) {
            self.domain.invalidate(tab);
            self.clear_tab(tab);
        }

        let active = self.home.active_tab;
        if active.is_platform_scoped() {
            self.load_tab(active);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────────────────────

    fn open_column_filter(&mut self) {
        let Some(grid) = self.active_grid() else {
            return;
        };
        let columns = grid.columns();
        let options: HashMap<String, Vec<String>> = columns
            .iter()
            .filter(|c| c.filterable)
            .map(|c| (c.key.clone(), grid.filter_options(&c.key)))
            .collect();

        if options.is_empty() {
            self.notifications.info("No filterable columns here");
            return;
        }
        self.column_filter_dialog
            .set_columns(columns, |key| options.get(key).cloned().unwrap_or_default());
        self.modals.push(Modal::ColumnFilter);
    }

    fn open_export(&mut self) {
        let Some(grid) = self.active_grid_ref() else {
            return;
        };
        let available = ExportFormat::all()
            .into_iter()
            .filter(|f| grid.has_exporter(*f))
            .collect();
        let rows = grid.total_rows();
        self.export_dialog.set_context(available, rows);
        self.modals.push(Modal::Export);
    }

    fn export(&mut self, format: ExportFormat) {
        if self.modals.top() == Some(&Modal::Export) {
            self.modals.pop();
        }

        // The devices grid only holds one page; fetch every matching row first
        if self.home.active_tab == Tab::Devices && self.devices.grid.has_exporter(format) {
            let query = self.devices.grid.query();
            self.notifications.info(format!(
                "Exporting {} devices...",
                self.devices.grid.total_rows()
            ));
            self.spawn_request(Tab::Devices, Request::ExportDevices(query, format));
            return;
        }

        let outcome = match self.active_grid() {
            None => return,
            Some(grid) if !grid.has_exporter(format) => {
                Err(anyhow!("{} export is not available", format))
            }
            Some(grid) => grid.export(format),
        };
        self.report_export(outcome);
    }

    fn report_export(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(location) => self
                .notifications
                .success(format!("Exported to {}", location)),
            Err(e) => {
                warn!("Export failed: {}", e);
                self.notifications.error(e.to_string());
            }
        }
    }

    fn open_new_record(&mut self) {
        let (purpose, fields) = match self.home.active_tab {
            Tab::Groups => (FormPurpose::NewGroup, NewDeviceGroup::form_fields()),
            Tab::Geofences => (FormPurpose::NewGeofence, NewGeofence::form_fields()),
            Tab::Repository => (
                FormPurpose::NewRepository,
                NewRepository::form_fields(self.domain.platform),
            ),
            _ => return,
        };
        self.form_dialog.open(purpose.title(), fields);
        self.modals.push(Modal::Form { purpose });
    }

    /// Fetch the selected profile; the form opens when it arrives
    fn open_edit_profile(&mut self) {
        let Some(id) = self.profiles.selected().map(|p| p.id.clone()) else {
            self.notifications.info("No profile selected");
            return;
        };
        self.spawn_request(Tab::Profiles, Request::LoadProfile(id));
    }

    fn open_profile_form(&mut self, profile: Profile) {
        // The user moved on while the profile was loading
        if self.home.active_tab != Tab::Profiles || !self.modals.is_empty() {
            return;
        }
        let purpose = FormPurpose::EditProfile {
            id: profile.id.clone(),
        };
        let title = format!("{}: {}", purpose.title(), profile.name);
        self.form_dialog.open(&title, profile.form_fields());
        self.editing_profile = Some(profile);
        self.modals.push(Modal::Form { purpose });
    }

    /// Validate the form; on success close it and send the request
    fn submit_form(&mut self, fields: Vec<FormField>) {
        let Some(Modal::Form { purpose }) = self.modals.top().cloned() else {
            return;
        };

        let (tab, request) = match &purpose {
            FormPurpose::NewGroup => (
                Tab::Groups,
                NewDeviceGroup::from_fields(&fields).map(Request::CreateGroup),
            ),
            FormPurpose::NewGeofence => (
                Tab::Geofences,
                NewGeofence::from_fields(&fields).map(Request::CreateGeofence),
            ),
            FormPurpose::NewRepository => (
                Tab::Repository,
                NewRepository::from_fields(&fields).map(Request::CreateRepository),
            ),
            FormPurpose::EditProfile { id } => {
                let profile = self
                    .editing_profile
                    .as_ref()
                    .filter(|p| &p.id == id)
                    .or_else(|| self.profiles.grid.records().iter().find(|p| &p.id == id));
                let Some(profile) = profile else {
                    self.modals.pop();
                    self.notifications.error("Profile is no longer loaded");
                    return;
                };
                (
                    Tab::Profiles,
                    profile.apply_fields(&fields).map(Request::SaveProfile),
                )
            }
        };

        match request {
            Ok(request) => {
                self.modals.pop();
                self.spawn_request(tab, request);
            }
            Err(e) => self.form_dialog.set_error(e.to_string()),
        }
    }

    fn open_delete_confirm(&mut self) {
        let tab = self.home.active_tab;
        if !tab.supports_delete() {
            return;
        }
        let Some((id, name)) = self.active_grid_ref().and_then(|g| g.selected_record()) else {
            self.notifications.info("Nothing selected");
            return;
        };
        self.confirm_delete_dialog = Some(ConfirmDeleteDialog::new(tab, &name));
        self.modals.push(Modal::ConfirmDelete { tab, id, name });
    }

    fn close_modal(&mut self) {
        if let Some(Modal::ConfirmDelete { .. }) = self.modals.pop() {
            self.confirm_delete_dialog = None;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        if self.mode == AppMode::Running {
            self.load_tab(self.home.active_tab);
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        match self.mode {
            AppMode::Setup => self.setup.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else if self.home.search_mode {
                    self.handle_search_key_event(key)
                } else if let Some(action) = self.home.handle_key_event(key)? {
                    Ok(Some(action))
                } else {
                    match self.active_grid() {
                        Some(grid) => grid.handle_key_event(key),
                        None => Ok(None),
                    }
                }
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.mode != AppMode::Running || !self.modals.is_empty() {
            return Ok(None);
        }
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(Action::MouseDown(mouse.column, mouse.row))
            }
            MouseEventKind::Drag(MouseButton::Left) => Some(Action::MouseDrag(mouse.column)),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::MouseUp),
            MouseEventKind::ScrollDown => Some(Action::NextItem),
            MouseEventKind::ScrollUp => Some(Action::PrevItem),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                for completed in self.runner.poll() {
                    self.apply_completed(completed);
                }
                self.notifications.prune(Instant::now());
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Tabs & Platform
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab | Action::PrevTab | Action::SelectTab(_) => {
                self.home.update(action)?;
                self.load_if_needed(self.home.active_tab);
            }
            Action::NextPlatform => self.change_platform(self.domain.platform.next()),
            Action::PrevPlatform => self.change_platform(self.domain.platform.previous()),
            Action::Reload => self.load_tab(self.home.active_tab),
            Action::LoadDevicePage => self.refresh_tab(Tab::Devices),

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode | Action::ExitSearchMode => {
                self.home.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Detail Panel
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollDetailDown | Action::ScrollDetailUp => {
                self.detail.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Grid (delegate to the active grid)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem
            | Action::PrevItem
            | Action::FirstItem
            | Action::LastItem
            | Action::FocusNextColumn
            | Action::FocusPrevColumn
            | Action::SortFocused
            | Action::ClearSort
            | Action::NextPage
            | Action::PrevPage
            | Action::GrowPageSize
            | Action::ShrinkPageSize
            | Action::WidenColumn
            | Action::NarrowColumn
            | Action::ClearFilters
            | Action::SearchInput(_)
            | Action::SearchBackspace
            | Action::ClearSearch
            | Action::MouseDown(_, _)
            | Action::MouseDrag(_)
            | Action::MouseUp => {
                if let Some(grid) = self.active_grid() {
                    grid.update(action)?;
                }
            }
            Action::SetColumnFilter { .. } => {
                if self.modals.top() == Some(&Modal::ColumnFilter) {
                    self.modals.pop();
                }
                if let Some(grid) = self.active_grid() {
                    grid.update(action)?;
                }
            }
            Action::ToggleColumn(_) => {
                let columns = match self.active_grid() {
                    Some(grid) => {
                        grid.update(action)?;
                        grid.columns()
                    }
                    None => Vec::new(),
                };
                self.columns_dialog.set_columns(columns);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenColumnFilter => self.open_column_filter(),
            Action::OpenColumnVisibility => {
                if let Some(columns) = self.active_grid_ref().map(|g| g.columns()) {
                    self.columns_dialog.set_columns(columns);
                    self.modals.push(Modal::ColumnVisibility);
                }
            }
            Action::OpenExport => self.open_export(),
            Action::Export(format) => self.export(format),
            Action::OpenQuitDialog => {
                self.quit_dialog.pending_requests = self.runner.in_flight();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => self.modals.push(Modal::Help),
            Action::OpenNewRecord => self.open_new_record(),
            Action::OpenEditProfile => self.open_edit_profile(),
            Action::OpenDeleteConfirm => self.open_delete_confirm(),
            Action::SubmitForm(fields) => self.submit_form(fields),
            Action::CloseModal => self.close_modal(),
            Action::ConfirmModal => {
                if let Some(Modal::ConfirmDelete { tab, id, .. }) = self.modals.top().cloned() {
                    self.close_modal();
                    self.spawn_request(tab, Request::Delete { tab, id });
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Setup Wizard
            // ─────────────────────────────────────────────────────────────────
            Action::SetupConfirm => {
                if let Some(config) = self.setup.get_config().cloned() {
                    match self.connect(config) {
                        Ok(()) => self.load_tab(self.home.active_tab),
                        Err(e) => {
                            warn!("Setup produced an unusable config: {}", e);
                            self.setup = SetupComponent::new();
                        }
                    }
                }
            }
        }

        self.drain_page_requests();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Setup => self.setup.draw(frame, area)?,
            AppMode::Running => {
                let tab = self.home.active_tab;
                let selected = self.active_grid_ref().and_then(|g| g.selected_detail());
                self.detail.set_record(selected);
                let search = self
                    .active_grid_ref()
                    .map(|g| g.search().to_string())
                    .unwrap_or_default();

                // Build render context
                let ctx = HomeRenderContext {
                    platform: self.domain.platform,
                    api_url: self
                        .client
                        .as_ref()
                        .map(|c| c.base_url().as_str())
                        .unwrap_or(""),
                    authenticated: self.client.as_ref().is_some_and(|c| c.has_token()),
                    search: &search,
                    notification: self.notifications.current(),
                    loaded_at: self.domain.loaded_at(tab),
                    loading: self.domain.is_loading(tab),
                    in_flight: self.runner.in_flight(),
                };

                let content: &mut dyn Component = match tab {
                    Tab::Dashboard => &mut self.dashboard,
                    Tab::Devices => &mut self.devices,
                    Tab::Profiles => &mut self.profiles,
                    Tab::Groups => &mut self.groups,
                    Tab::Geofences => &mut self.geofences,
                    Tab::Repository => &mut self.repositories,
                };
                let detail = if tab == Tab::Dashboard {
                    None
                } else {
                    Some(&mut self.detail)
                };

                draw_home_screen(frame, area, &self.home, content, detail, &ctx)?;

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::ColumnFilter => self.column_filter_dialog.handle_key_event(key),
            Modal::ColumnVisibility => self.columns_dialog.handle_key_event(key),
            Modal::Export => self.export_dialog.handle_key_event(key),
            Modal::Form { .. } => self.form_dialog.handle_key_event(key),
            Modal::ConfirmDelete { .. } => match self.confirm_delete_dialog.as_mut() {
                Some(dialog) => dialog.handle_key_event(key),
                None => Ok(Some(Action::CloseModal)),
            },
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ClearSearch)
            }
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::ColumnFilter => self.column_filter_dialog.draw(frame, area)?,
            Modal::ColumnVisibility => self.columns_dialog.draw(frame, area)?,
            Modal::Export => self.export_dialog.draw(frame, area)?,
            Modal::Form { .. } => self.form_dialog.draw(frame, area)?,
            Modal::ConfirmDelete { .. } => {
                if let Some(dialog) = self.confirm_delete_dialog.as_mut() {
                    dialog.draw(frame, area)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::model::notification::NotificationLevel;

    fn app() -> App {
        let config = Config {
            // Nothing listens here; tests never call init()
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            api_token: Some("secret".to_string()),
            ..Config::default()
        };
        App::new(Some(config))
    }

    fn group(id: &str, name: &str) -> DeviceGroup {
        DeviceGroup {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            device_count: 0,
        }
    }

    fn completed(tab: Tab, generation: u64, result: Result<Payload, ApiError>) -> Completed {
        Completed {
            tab,
            generation,
            description: "load groups".to_string(),
            result,
        }
    }

    #[test]
    fn test_new_without_config_starts_setup() {
        let app = App::new(None);
        assert_eq!(app.mode, AppMode::Setup);
        assert!(app.client.is_none());
    }

    #[test]
    fn test_new_with_config_runs() {
        let app = app();
        assert_eq!(app.mode, AppMode::Running);
        assert!(app.client.as_ref().is_some_and(|c| c.has_token()));
        assert!(app.devices.grid.has_exporter(ExportFormat::Csv));
        assert!(!app.devices.grid.has_exporter(ExportFormat::Pdf));
    }

    #[test]
    fn test_stale_listing_is_dropped() {
        let mut app = app();
        let old = app.domain.bump_generation(Tab::Groups);
        let new = app.domain.bump_generation(Tab::Groups);

        app.apply_completed(completed(
            Tab::Groups,
            old,
            Ok(Payload::Groups(vec![group("g1", "Old")])),
        ));
        assert!(app.groups.grid.records().is_empty());

        app.apply_completed(completed(
            Tab::Groups,
            new,
            Ok(Payload::Groups(vec![group("g2", "New")])),
        ));
        assert_eq!(app.groups.grid.records().len(), 1);
        assert!(app.domain.loaded_at(Tab::Groups).is_some());
    }

    #[test]
    fn test_mutation_result_is_never_stale() {
        let mut app = app();
        app.domain.bump_generation(Tab::Groups);
        app.apply_completed(completed(
            Tab::Groups,
            0,
            Ok(Payload::Created {
                tab: Tab::Groups,
                name: "Kiosks".to_string(),
            }),
        ));
        let notification = app.notifications.current().unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        assert!(notification.message.contains("Kiosks"));
        // Groups is not the active tab, so it is only marked for reload
        assert!(app.domain.needs_load(Tab::Groups));
    }

    #[test]
    fn test_unauthorized_error_notifies() {
        let mut app = app();
        let generation = app.domain.bump_generation(Tab::Groups);
        app.domain.start_loading(Tab::Groups);
        app.apply_completed(completed(
            Tab::Groups,
            generation,
            Err(ApiError::Unauthorized("token expired".to_string())),
        ));

        let notification = app.notifications.current().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("token rejected"));
        assert!(!app.domain.is_loading(Tab::Groups));
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = app();
        app.home.select_tab(Tab::Groups);
        app.update(Action::OpenNewRecord).unwrap();
        assert!(matches!(app.modals.top(), Some(Modal::Form { .. })));

        app.update(Action::SubmitForm(NewDeviceGroup::form_fields()))
            .unwrap();
        assert!(matches!(app.modals.top(), Some(Modal::Form { .. })));
        assert_eq!(app.runner.in_flight(), 0);
    }

    #[test]
    fn test_platform_change_clears_scoped_tabs() {
        let mut app = app();
        let platform = app.domain.platform;
        app.groups.set_records(vec![group("g1", "Kiosks")]);
        app.domain.finish_loading(Tab::Groups);
        app.domain.finish_loading(Tab::Profiles);

        app.update(Action::NextPlatform).unwrap();
        assert_eq!(app.domain.platform, platform.next());
        assert!(app.domain.needs_load(Tab::Profiles));
        // Groups are not platform scoped
        assert_eq!(app.groups.grid.records().len(), 1);
        assert!(!app.domain.needs_load(Tab::Groups));
    }

    #[test]
    fn test_group_filter_lists_all_groups() {
        let mut app = app();
        assert!(app.devices.filter_options("groupId").is_empty());

        let generation = app.domain.bump_generation(Tab::Groups);
        app.apply_completed(completed(
            Tab::Groups,
            generation,
            Ok(Payload::Groups(vec![group("g2", "Lobby"), group("g1", "Kiosks")])),
        ));

        // A page filtered down to one group must not narrow the choices
        app.devices.grid.set_column_filter("groupId", "g1");
        let page: Vec<Device> =
            serde_json::from_str(r#"[{"id": "d-1", "name": "Pixel", "groupId": "g1"}]"#).unwrap();
        app.devices.set_server_page(page, 1);

        assert_eq!(app.devices.filter_options("groupId"), vec!["g1", "g2"]);
    }

    #[test]
    fn test_export_without_formatter_notifies() {
        let mut app = app();
        app.home.select_tab(Tab::Groups);
        app.update(Action::Export(ExportFormat::Pdf)).unwrap();
        let notification = app.notifications.current().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("PDF"));
    }

    #[test]
    fn test_device_export_fetches_every_page() {
        let mut app = app();
        app.home.select_tab(Tab::Devices);
        app.devices.set_server_page(Vec::new(), 42);

        app.update(Action::Export(ExportFormat::Csv)).unwrap();
        assert_eq!(app.runner.in_flight(), 1);
        assert!(app
            .notifications
            .current()
            .unwrap()
            .message
            .contains("42 devices"));
    }

    #[test]
    fn test_device_export_writes_all_fetched_rows() {
        let dir = std::env::temp_dir().join(format!("uem-console-export-{}", std::process::id()));
        let config = Config {
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            export_dir: Some(dir.display().to_string()),
            ..Config::default()
        };
        let mut app = App::new(Some(config));
        // Only one page is loaded in the grid
        app.devices.set_server_page(Vec::new(), 3);

        let devices: Vec<Device> = serde_json::from_str(
            r#"[{"id": "d-1", "name": "A"}, {"id": "d-2", "name": "B"}, {"id": "d-3", "name": "C"}]"#,
        )
        .unwrap();
        app.apply_completed(Completed {
            tab: Tab::Devices,
            generation: 0,
            description: "export devices as CSV".to_string(),
            result: Ok(Payload::DeviceExport {
                format: ExportFormat::Csv,
                devices,
            }),
        });

        let notification = app.notifications.current().unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        let path = notification.message.trim_start_matches("Exported to ").to_string();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn test_edit_profile_opens_with_fetched_copy() {
        let mut app = app();
        app.home.select_tab(Tab::Profiles);
        let listed: Profile =
            serde_json::from_str(r#"{"id": "p-1", "name": "Old name"}"#).unwrap();
        app.profiles.set_records(vec![listed]);

        app.update(Action::OpenEditProfile).unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(app.runner.in_flight(), 1);

        let fresh: Profile = serde_json::from_str(r#"{"id": "p-1", "name": "New name"}"#).unwrap();
        let generation = app.domain.generation(Tab::Profiles);
        app.apply_completed(completed(
            Tab::Profiles,
            generation,
            Ok(Payload::ProfileLoaded(fresh)),
        ));

        match app.modals.top() {
            Some(Modal::Form {
                purpose: FormPurpose::EditProfile { id },
            }) => assert_eq!(id, "p-1"),
            other => panic!("unexpected modal {:?}", other),
        }
        assert_eq!(
            app.editing_profile.as_ref().map(|p| p.name.as_str()),
            Some("New name")
        );
    }

    #[test]
    fn test_stale_profile_fetch_is_dropped() {
        let mut app = app();
        app.home.select_tab(Tab::Profiles);
        let old = app.domain.bump_generation(Tab::Profiles);
        app.domain.bump_generation(Tab::Profiles);

        let profile: Profile = serde_json::from_str(r#"{"id": "p-1", "name": "Kiosk"}"#).unwrap();
        app.apply_completed(completed(
            Tab::Profiles,
            old,
            Ok(Payload::ProfileLoaded(profile)),
        ));
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_delete_confirm_flow() {
        let mut app = app();
        app.home.select_tab(Tab::Groups);
        app.groups.set_records(vec![group("g1", "Kiosks")]);

        app.update(Action::OpenDeleteConfirm).unwrap();
        match app.modals.top() {
            Some(Modal::ConfirmDelete { id, name, .. }) => {
                assert_eq!(id, "g1");
                assert_eq!(name, "Kiosks");
            }
            other => panic!("unexpected modal {:?}", other),
        }

        app.update(Action::CloseModal).unwrap();
        assert!(app.modals.is_empty());
        assert!(app.confirm_delete_dialog.is_none());
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = App::new(None);
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }
}
