//! Domain state - what the console currently knows about the backend

use super::dashboard::DashboardSummary;
use super::platform::Platform;
use super::ui::Tab;
use chrono::{DateTime, Local};
use std::collections::{HashMap, HashSet};

/// Backend-derived state that is not owned by a single grid
#[derive(Debug, Default)]
pub struct DomainState {
    /// Platform used for platform-scoped endpoints
    pub platform: Platform,

    /// Fleet overview for the dashboard tab
    pub dashboard: Option<DashboardSummary>,

    /// Bumped whenever a tab's data is invalidated; responses tagged with an
    /// older generation are dropped
    generations: HashMap<Tab, u64>,

    /// Tabs with a load in flight
    loading: HashSet<Tab>,

    /// When each tab last received data
    loaded_at: HashMap<Tab, DateTime<Local>>,
}

impl DomainState {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    pub fn generation(&self, tab: Tab) -> u64 {
        self.generations.get(&tab).copied().unwrap_or(0)
    }

    /// Invalidate a tab's data and return the new generation
    pub fn bump_generation(&mut self, tab: Tab) -> u64 {
        let entry = self.generations.entry(tab).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Forget a tab's data so the next visit reloads it. Responses still in
    /// flight for the old generation are dropped on arrival.
    pub fn invalidate(&mut self, tab: Tab) -> u64 {
        self.loading.remove(&tab);
        self.loaded_at.remove(&tab);
        self.bump_generation(tab)
    }

    /// Never loaded (or invalidated) and nothing in flight
    pub fn needs_load(&self, tab: Tab) -> bool {
        !self.loading.contains(&tab) && !self.loaded_at.contains_key(&tab)
    }

    pub fn is_current(&self, tab: Tab, generation: u64) -> bool {
        self.generation(tab) == generation
    }

    pub fn start_loading(&mut self, tab: Tab) {
        self.loading.insert(tab);
    }

    pub fn finish_loading(&mut self, tab: Tab) {
        self.loading.remove(&tab);
        self.loaded_at.insert(tab, Local::now());
    }

    pub fn fail_loading(&mut self, tab: Tab) {
        self.loading.remove(&tab);
    }

    pub fn is_loading(&self, tab: Tab) -> bool {
        self.loading.contains(&tab)
    }

    pub fn loaded_at(&self, tab: Tab) -> Option<String> {
        self.loaded_at
            .get(&tab)
            .map(|t| t.format("%H:%M:%S").to_string())
    }
}
