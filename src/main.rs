//! uem-console - A terminal console for a unified endpoint management backend
//!
//! This is the main entry point for the uem-console application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod api;
mod app;
mod component;
mod components;
mod config;
mod grid;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::{Input, Tui};
use anyhow::Result;
use log::LevelFilter;
use std::fs::{self, File};
use std::time::Duration;

fn main() -> Result<()> {
    let config = Config::load().map(Config::with_env_overrides);
    init_logging(config.as_ref());

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        log::error!("Fatal: {:?}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file next to the config; the terminal belongs to the UI
fn init_logging(config: Option<&Config>) {
    let level = config
        .map(Config::log_level_filter)
        .unwrap_or(LevelFilter::Info);
    let Some(path) = Config::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    if let Ok(file) = File::create(&path) {
        let _ = simplelog::WriteLogger::init(level, simplelog::Config::default(), file);
    }
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            let area = frame.area();
            if let Err(e) = app.draw(frame, area) {
                log::error!("Draw error: {}", e);
            }
        })?;

        // Poll for input
        if let Some(input) = tui.next_input()? {
            // Convert input to action
            let action = match input {
                Input::Key(key) => app.handle_key_event(key)?,
                Input::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Input::Resize(w, h) => Some(Action::Resize(w, h)),
            };

            // Process the action
            if let Some(action) = action {
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // Nothing to handle - tick to poll background requests
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
