//! Background request runner
//!
//! Each backend call runs on its own thread and reports back over an mpsc
//! channel that the app polls on every tick. Responses are tagged with the
//! generation of the view that asked for them so late answers for a view that
//! has since been replaced can be dropped.

use crate::api::{ApiClient, ApiError, Page};
use crate::grid::{ExportFormat, GridQuery};
use crate::model::ui::Tab;
use crate::model::{
    DashboardSummary, Device, DeviceGroup, Geofence, NewDeviceGroup, NewGeofence, NewRepository,
    Platform, Profile, Repository,
};
use log::{debug, error};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// A backend call the console can make
#[derive(Debug, Clone)]
pub enum Request {
    Dashboard,
    Devices(GridQuery),
    Profiles,
    Groups,
    Geofences,
    Repositories,
    /// Every device matching the devices grid query, for export
    ExportDevices(GridQuery, ExportFormat),
    /// Fresh copy of one profile before editing it
    LoadProfile(String),
    SaveProfile(Profile),
    CreateGroup(NewDeviceGroup),
    CreateGeofence(NewGeofence),
    CreateRepository(NewRepository),
    Delete { tab: Tab, id: String },
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Dashboard => write!(f, "load dashboard"),
            Request::Devices(q) => write!(f, "load devices (page {})", q.page),
            Request::Profiles => write!(f, "load profiles"),
            Request::Groups => write!(f, "load groups"),
            Request::Geofences => write!(f, "load geofences"),
            Request::Repositories => write!(f, "load repositories"),
            Request::ExportDevices(_, format) => write!(f, "export devices as {}", format),
            Request::LoadProfile(id) => write!(f, "load profile '{}'", id),
            Request::SaveProfile(p) => write!(f, "save profile '{}'", p.name),
            Request::CreateGroup(g) => write!(f, "create group '{}'", g.name),
            Request::CreateGeofence(g) => write!(f, "create geofence '{}'", g.name),
            Request::CreateRepository(r) => write!(f, "add repository '{}'", r.name),
            Request::Delete { tab, id } => write!(f, "delete {} '{}'", tab.name(), id),
        }
    }
}

/// Successful result of a `Request`
#[derive(Debug, Clone)]
pub enum Payload {
    Dashboard(DashboardSummary),
    Devices(Page<Device>),
    Profiles(Vec<Profile>),
    Groups(Vec<DeviceGroup>),
    Geofences(Vec<Geofence>),
    Repositories(Vec<Repository>),
    DeviceExport {
        format: ExportFormat,
        devices: Vec<Device>,
    },
    ProfileLoaded(Profile),
    ProfileSaved(Profile),
    Created { tab: Tab, name: String },
    Deleted { tab: Tab, id: String },
}

impl Payload {
    /// Listings replace view data and are subject to the generation check;
    /// mutation outcomes and exports are always reported
    pub fn is_listing(&self) -> bool {
        !matches!(
            self,
            Payload::DeviceExport { .. }
                | Payload::ProfileLoaded(_)
                | Payload::ProfileSaved(_)
                | Payload::Created { .. }
                | Payload::Deleted { .. }
        )
    }
}

impl Request {
    /// Run the call on the current thread
    pub fn execute(self, client: &ApiClient, platform: Platform) -> Result<Payload, ApiError> {
        match self {
            Request::Dashboard => {
                let mut devices = Vec::new();
                for p in Platform::all() {
                    let mut batch = client.all_devices(p)?;
                    for device in &mut batch {
                        device.platform = p;
                    }
                    devices.extend(batch);
                }
                Ok(Payload::Dashboard(DashboardSummary::from_devices(&devices)))
            }
            Request::Devices(query) => client.list_devices(platform, &query).map(Payload::Devices),
            Request::Profiles => client.list_profiles(platform).map(Payload::Profiles),
            Request::Groups => client.list_groups().map(Payload::Groups),
            Request::Geofences => client.list_geofences().map(Payload::Geofences),
            Request::Repositories => client.list_repositories(platform).map(Payload::Repositories),
            Request::ExportDevices(query, format) => {
                let devices = client.matching_devices(platform, &query)?;
                Ok(Payload::DeviceExport { format, devices })
            }
            Request::LoadProfile(id) => client
                .get_profile(platform, &id)
                .map(Payload::ProfileLoaded),
            Request::SaveProfile(profile) => client
                .update_profile(platform, &profile)
                .map(Payload::ProfileSaved),
            Request::CreateGroup(group) => {
                client.create_group(&group)?;
                Ok(Payload::Created {
                    tab: Tab::Groups,
                    name: group.name,
                })
            }
            Request::CreateGeofence(geofence) => {
                client.create_geofence(&geofence)?;
                Ok(Payload::Created {
                    tab: Tab::Geofences,
                    name: geofence.name,
                })
            }
            Request::CreateRepository(repository) => {
                client.add_repository(platform, &repository)?;
                Ok(Payload::Created {
                    tab: Tab::Repository,
                    name: repository.name,
                })
            }
            Request::Delete { tab, id } => {
                match tab {
                    Tab::Groups => client.delete_group(&id)?,
                    Tab::Geofences => client.delete_geofence(&id)?,
                    Tab::Repository => client.delete_repository(platform, &id)?,
                    other => {
                        return Err(ApiError::http(
                            405,
                            format!("{} records cannot be deleted", other.name()),
                        ))
                    }
                }
                Ok(Payload::Deleted { tab, id })
            }
        }
    }
}

/// A finished request as delivered to the UI thread
#[derive(Debug)]
pub struct Completed {
    pub tab: Tab,
    pub generation: u64,
    pub description: String,
    pub result: Result<Payload, ApiError>,
}

/// Runs requests on worker threads and collects their results
pub struct RequestRunner {
    sender: Sender<Completed>,
    receiver: Receiver<Completed>,
    in_flight: usize,
}

impl Default for RequestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRunner {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start a request in the background
    pub fn spawn(
        &mut self,
        client: &ApiClient,
        platform: Platform,
        tab: Tab,
        generation: u64,
        request: Request,
    ) {
        let client = client.clone();
        let description = request.to_string();
        self.spawn_job(tab, generation, description, move || {
            request.execute(&client, platform)
        });
    }

    /// Run `job` on a worker thread. Exactly one `Completed` is sent back,
    /// even when the job panics.
    pub fn spawn_job<F>(&mut self, tab: Tab, generation: u64, description: String, job: F)
    where
        F: FnOnce() -> Result<Payload, ApiError> + Send + 'static,
    {
        let tx = self.sender.clone();
        debug!("spawn {} [{} gen {}]", description, tab.name(), generation);

        self.in_flight += 1;
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|cause| {
                let reason = panic_message(cause.as_ref());
                error!("{} panicked: {}", description, reason);
                Err(ApiError::Aborted(reason))
            });
            // Receiver gone means the app is shutting down
            let _ = tx.send(Completed {
                tab,
                generation,
                description,
                result,
            });
        });
    }

    /// Collect everything that finished since the last poll
    pub fn poll(&mut self) -> Vec<Completed> {
        let mut done = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completed) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    done.push(completed);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_server::serve_once;
    use std::time::{Duration, Instant};

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, None, Duration::from_secs(5)).unwrap()
    }

    fn wait_for(runner: &mut RequestRunner) -> Vec<Completed> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let done = runner.poll();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_spawn_and_poll() {
        let (base, server) = serve_once("200 OK", r#"[{"id": "g-1", "name": "Lobby"}]"#);
        let mut runner = RequestRunner::new();

        runner.spawn(&client(&base), Platform::Android, Tab::Groups, 3, Request::Groups);
        assert!(runner.is_busy());

        let done = wait_for(&mut runner);
        server.join().unwrap();

        assert_eq!(done.len(), 1);
        assert_eq!(done[0].tab, Tab::Groups);
        assert_eq!(done[0].generation, 3);
        assert_eq!(done[0].description, "load groups");
        match &done[0].result {
            Ok(Payload::Groups(groups)) => assert_eq!(groups[0].name, "Lobby"),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_errors_are_delivered() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"message": "db down"}"#);
        let mut runner = RequestRunner::new();

        runner.spawn(&client(&base), Platform::Ios, Tab::Profiles, 1, Request::Profiles);
        let done = wait_for(&mut runner);
        server.join().unwrap();

        let err = done[0].result.as_ref().unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: db down");
    }

    #[test]
    fn test_panicking_job_still_completes() {
        let mut runner = RequestRunner::new();

        runner.spawn_job(Tab::Devices, 7, "load devices".to_string(), || {
            panic!("malformed page")
        });
        assert_eq!(runner.in_flight(), 1);

        let done = wait_for(&mut runner);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].generation, 7);
        match &done[0].result {
            Err(ApiError::Aborted(reason)) => assert_eq!(reason, "malformed page"),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(runner.in_flight(), 0);
        assert!(!runner.is_busy());
    }

    #[test]
    fn test_delete_unsupported_tab() {
        let api = client("http://127.0.0.1:9");
        let result = Request::Delete {
            tab: Tab::Devices,
            id: "d-1".to_string(),
        }
        .execute(&api, Platform::Android);
        assert_eq!(result.unwrap_err().status_code(), Some(405));
    }

    #[test]
    fn test_payload_listing() {
        assert!(Payload::Groups(vec![]).is_listing());
        assert!(!Payload::DeviceExport {
            format: ExportFormat::Csv,
            devices: vec![]
        }
        .is_listing());
        assert!(!Payload::Deleted {
            tab: Tab::Groups,
            id: "x".to_string()
        }
        .is_listing());
    }
}
