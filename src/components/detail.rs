//! Detail panel component
//!
//! Shows every field of the record selected in the active grid, including
//! fields whose columns are hidden.

use crate::action::Action;
use crate::component::Component;
use crate::model::form::yes_no;
use crate::model::{Device, DeviceGroup, Geofence, Profile, Repository};
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// Label/value pairs describing a record in the detail panel
pub trait Describe {
    /// Human name used in titles and confirmations
    fn label(&self) -> String;

    fn describe(&self) -> Vec<(String, String)>;
}

fn pair(label: &str, value: impl ToString) -> (String, String) {
    (label.to_string(), value.to_string())
}

impl Describe for Device {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn describe(&self) -> Vec<(String, String)> {
        vec![
            pair("ID", &self.id),
            pair("Platform", self.platform),
            pair("Model", &self.model),
            pair("OS version", &self.os_version),
            pair("Owner", &self.owner),
            pair("Status", format!("{} {}", self.status.icon(), self.status)),
            pair("Compliant", yes_no(self.compliant)),
            pair(
                "Battery",
                self.battery_level
                    .map(|b| format!("{}%", b))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            pair("Last seen", self.last_seen_label(Utc::now())),
            pair("Group", self.group_id.as_deref().unwrap_or("-")),
        ]
    }
}

impl Describe for Profile {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn describe(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            pair("ID", &self.id),
            pair("Platform", self.platform),
            pair("Assigned devices", self.assigned_devices),
            pair("Policies", self.policy_summary().join(", ")),
        ];
        // Policy values share the edit form's flattening
        pairs.extend(
            self.form_fields()
                .into_iter()
                .map(|field| (field.label, field.value)),
        );
        pairs
    }
}

impl Describe for DeviceGroup {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn describe(&self) -> Vec<(String, String)> {
        vec![
            pair("ID", &self.id),
            pair("Name", &self.name),
            pair("Description", &self.description),
            pair("Devices", self.device_count),
        ]
    }
}

impl Describe for Geofence {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn describe(&self) -> Vec<(String, String)> {
        vec![
            pair("ID", &self.id),
            pair("Name", &self.name),
            pair("Coordinates", self.coordinates()),
            pair("Radius", format!("{} m", self.radius_meters)),
            pair("Description", &self.description),
        ]
    }
}

impl Describe for Repository {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn describe(&self) -> Vec<(String, String)> {
        vec![
            pair("ID", &self.id),
            pair("Name", &self.name),
            pair("URL", &self.url),
            pair("Platform", self.platform),
            pair("Kind", &self.kind),
            pair("Enabled", yes_no(self.enabled)),
        ]
    }
}

/// Detail panel for the selected record
#[derive(Default)]
pub struct DetailComponent {
    scroll: usize,
    title: String,
    pairs: Vec<(String, String)>,
}

impl DetailComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content; scroll resets when the record changes
    pub fn set_record(&mut self, record: Option<(String, Vec<(String, String)>)>) {
        let (title, pairs) = record.unwrap_or_default();
        if title != self.title || pairs != self.pairs {
            self.scroll = 0;
        }
        self.title = title;
        self.pairs = pairs;
    }

    fn lines(&self) -> Vec<Line<'static>> {
        if self.pairs.is_empty() {
            return vec![Line::from(Span::styled(
                "No record selected",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let label_width = self
            .pairs
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        self.pairs
            .iter()
            .map(|(label, value)| {
                let value_style = if value.is_empty() || value == "-" {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:width$}  ", label, width = label_width),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        if value.is_empty() { "-".to_string() } else { value.clone() },
                        value_style,
                    ),
                ])
            })
            .collect()
    }
}

impl Component for DetailComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDetailDown)
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDetailUp)
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.pairs.len().saturating_sub(1);
        match action {
            Action::ScrollDetailDown => self.scroll = (self.scroll + 1).min(max_scroll),
            Action::ScrollDetailUp => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = self.lines();
        let visible_height = area.height.saturating_sub(2) as usize;
        let title = if self.title.is_empty() {
            " Details ".to_string()
        } else {
            format!(" {} ", self.title)
        };

        let paragraph = Paragraph::new(content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_style(Style::default().add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        let total = content.len();
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
