//! Setup wizard component
//!
//! First-run configuration: backend URL, API token and the platform the
//! console starts on.

use crate::action::Action;
use crate::component::Component;
use crate::config::Config;
use crate::model::Platform;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use reqwest::Url;

/// Setup wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Welcome,
    ApiUrl,
    ApiToken,
    Platform,
    Confirm,
}

impl SetupStep {
    fn next(&self) -> Option<SetupStep> {
        match self {
            SetupStep::Welcome => Some(SetupStep::ApiUrl),
            SetupStep::ApiUrl => Some(SetupStep::ApiToken),
            SetupStep::ApiToken => Some(SetupStep::Platform),
            SetupStep::Platform => Some(SetupStep::Confirm),
            SetupStep::Confirm => None,
        }
    }

    fn prev(&self) -> Option<SetupStep> {
        match self {
            SetupStep::Welcome => None,
            SetupStep::ApiUrl => Some(SetupStep::Welcome),
            SetupStep::ApiToken => Some(SetupStep::ApiUrl),
            SetupStep::Platform => Some(SetupStep::ApiToken),
            SetupStep::Confirm => Some(SetupStep::Platform),
        }
    }

    fn title(&self) -> &str {
        match self {
            SetupStep::Welcome => "Welcome",
            SetupStep::ApiUrl => "Backend URL",
            SetupStep::ApiToken => "API Token",
            SetupStep::Platform => "Default Platform",
            SetupStep::Confirm => "Confirm",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            SetupStep::Welcome => 1,
            SetupStep::ApiUrl => 2,
            SetupStep::ApiToken => 3,
            SetupStep::Platform => 4,
            SetupStep::Confirm => 5,
        }
    }
}

/// Backend base URLs must be absolute http(s) URLs
pub fn validate_api_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Backend URL is required".to_string());
    }
    let url = Url::parse(trimmed).map_err(|e| format!("Invalid URL: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(format!("Unsupported scheme '{}', use http or https", other)),
    }
}

fn mask(token: &str) -> String {
    match token.chars().count() {
        0 => "(none)".to_string(),
        n if n <= 4 => "*".repeat(n),
        n => {
            let tail: String = token.chars().skip(n - 4).collect();
            format!("{}{}", "*".repeat(n - 4), tail)
        }
    }
}

/// Setup wizard component
pub struct SetupComponent {
    /// Current step
    pub step: SetupStep,
    /// Config being built
    pub config: Config,
    /// Current input text
    pub input: String,
    /// Error message to display
    pub error: Option<String>,
    /// Whether setup is complete
    pub complete: bool,
}

impl Default for SetupComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupComponent {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Start from an existing config (e.g. URL from the environment)
    pub fn with_config(config: Config) -> Self {
        Self {
            step: SetupStep::Welcome,
            config,
            input: String::new(),
            error: None,
            complete: false,
        }
    }

    /// Get the saved config if setup completed successfully
    pub fn get_config(&self) -> Option<&Config> {
        if self.complete {
            Some(&self.config)
        } else {
            None
        }
    }

    fn validate_current_step(&mut self) -> bool {
        self.error = None;

        match self.step {
            SetupStep::Welcome | SetupStep::Platform | SetupStep::Confirm => true,
            SetupStep::ApiUrl => match validate_api_url(&self.input) {
                Ok(url) => {
                    self.config.api_base_url = url;
                    true
                }
                Err(e) => {
                    self.error = Some(e);
                    false
                }
            },
            SetupStep::ApiToken => {
                let token = self.input.trim();
                if token.contains(char::is_whitespace) {
                    self.error = Some("Token must not contain spaces".to_string());
                    return false;
                }
                // Blank is allowed; the login can happen later via env var
                self.config.api_token = Some(token.to_string()).filter(|t| !t.is_empty());
                true
            }
        }
    }

    fn input_for_step(&self) -> String {
        match self.step {
            SetupStep::ApiUrl => self.config.api_base_url.clone(),
            SetupStep::ApiToken => self.config.api_token.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn advance_step(&mut self) {
        if self.validate_current_step() {
            if let Some(next) = self.step.next() {
                self.step = next;
                self.input = self.input_for_step();
            } else {
                self.save_config();
            }
        }
    }

    fn go_back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
            self.error = None;
            self.input = self.input_for_step();
        }
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => {
                log::info!("Saved configuration for {}", self.config.api_base_url);
                self.complete = true;
            }
            Err(e) => {
                self.error = Some(format!("Failed to save config: {}", e));
            }
        }
    }
}

impl Component for SetupComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.step {
            SetupStep::Welcome => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => Ok(Some(Action::ForceQuit)),
                _ => Ok(None),
            },
            SetupStep::ApiUrl | SetupStep::ApiToken => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => {
                    self.go_back();
                    Ok(None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.error = None;
                    Ok(None)
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.error = None;
                    Ok(None)
                }
                _ => Ok(None),
            },
            SetupStep::Platform => match key.code {
                KeyCode::Enter => {
                    self.advance_step();
                    Ok(None)
                }
                KeyCode::Esc => {
                    self.go_back();
                    Ok(None)
                }
                KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                    self.config.default_platform = self.config.default_platform.next();
                    Ok(None)
                }
                KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                    self.config.default_platform = self.config.default_platform.previous();
                    Ok(None)
                }
                _ => Ok(None),
            },
            SetupStep::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.save_config();
                    if self.complete {
                        Ok(Some(Action::SetupConfirm))
                    } else {
                        Ok(None)
                    }
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Backspace => {
                    self.go_back();
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let margin = 4;
        let content_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Progress
                Constraint::Min(10),   // Content
                Constraint::Length(3), // Help
            ])
            .split(content_area);

        let title = Paragraph::new(Line::from(vec![Span::styled(
            " UEM Console Setup ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let progress = format!(
            "Step {} of 5: {}",
            self.step.step_number(),
            self.step.title()
        );
        let progress_widget = Paragraph::new(Line::from(vec![Span::styled(
            progress,
            Style::default().fg(Color::DarkGray),
        )]));
        frame.render_widget(progress_widget, chunks[1]);

        let (title, border, lines) = match self.step {
            SetupStep::Welcome => (" Welcome ", Color::Green, self.welcome_lines()),
            SetupStep::ApiUrl => (
                " Backend URL ",
                Color::Cyan,
                self.input_lines(
                    "Enter the base URL of the device management API:",
                    "(e.g. https://uem.example.com/api)",
                    &self.input,
                ),
            ),
            SetupStep::ApiToken => (
                " API Token ",
                Color::Cyan,
                self.input_lines(
                    "Enter your API token (leave empty to skip):",
                    "(sent as a Bearer token with every request)",
                    &mask(&self.input),
                ),
            ),
            SetupStep::Platform => (" Default Platform ", Color::Cyan, self.platform_lines()),
            SetupStep::Confirm => (" Confirm Configuration ", Color::Green, self.confirm_lines()),
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(paragraph, chunks[2]);

        let help_text = match self.step {
            SetupStep::Welcome => " Enter  Continue   Esc  Quit",
            SetupStep::ApiUrl | SetupStep::ApiToken => {
                " Enter  Continue   Esc  Back   Type to edit"
            }
            SetupStep::Platform => " Enter  Continue   Esc  Back   ←/→  Change",
            SetupStep::Confirm => " Enter/y  Save & Continue   Esc/n  Go Back",
        };
        let help = Paragraph::new(Line::from(vec![Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);

        Ok(())
    }
}

impl SetupComponent {
    fn error_lines(&self, lines: &mut Vec<Line<'static>>) {
        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )]));
        }
    }

    fn welcome_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Welcome to the UEM console!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("This wizard connects the console to your device management backend."),
            Line::from(""),
            Line::from("You will need to provide:"),
            Line::from(vec![Span::styled(
                "  1. The backend API URL",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(vec![Span::styled(
                "  2. An API token (optional)",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(vec![Span::styled(
                "  3. The platform to start on",
                Style::default().fg(Color::Cyan),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Enter to begin...",
                Style::default().fg(Color::Yellow),
            )]),
        ]
    }

    fn input_lines(&self, prompt: &str, hint: &str, shown: &str) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(prompt.to_string()),
            Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", shown),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        self.error_lines(&mut lines);
        lines
    }

    fn platform_lines(&self) -> Vec<Line<'static>> {
        let mut spans = vec![Span::raw("  ")];
        for platform in Platform::all() {
            let style = if platform == self.config.default_platform {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", platform), style));
            spans.push(Span::raw(" "));
        }

        vec![
            Line::from(""),
            Line::from("Which platform should the console open on?"),
            Line::from(Span::styled(
                "(switch any time with p / P)",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(spans),
        ]
    }

    fn confirm_lines(&self) -> Vec<Line<'static>> {
        let config_path = Config::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.uem-console/config.json".to_string());

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Review your configuration:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Backend URL: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.api_base_url.clone()),
            ]),
            Line::from(vec![
                Span::styled("API token:   ", Style::default().fg(Color::Cyan)),
                Span::raw(mask(self.config.api_token.as_deref().unwrap_or(""))),
            ]),
            Line::from(vec![
                Span::styled("Platform:    ", Style::default().fg(Color::Cyan)),
                Span::raw(self.config.default_platform.to_string()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Config will be saved to: ", Style::default().fg(Color::DarkGray)),
                Span::raw(config_path),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press Enter or 'y' to save and continue...",
                Style::default().fg(Color::Yellow),
            )]),
        ];
        self.error_lines(&mut lines);
        lines
    }
}
