//! Record form dialog
//!
//! A column of single-line text inputs. Validation happens when the app
//! turns the submitted fields into a request; errors come back through
//! `set_error` and the dialog stays open.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::FormField;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Default)]
pub struct FormDialog {
    title: String,
    fields: Vec<FormField>,
    focused: usize,
    error: Option<String>,
    scroll: u16,
}

impl FormDialog {
    pub fn open(&mut self, title: &str, fields: Vec<FormField>) {
        self.title = title.to_string();
        self.fields = fields;
        self.focused = 0;
        self.error = None;
        self.scroll = 0;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    fn focus(&mut self, index: usize) {
        if !self.fields.is_empty() {
            self.focused = index.min(self.fields.len() - 1);
        }
    }

    fn current(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focused)
    }

    fn label_width(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.label.chars().count() + usize::from(f.required))
            .max()
            .unwrap_or(0)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let width = self.label_width();
        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let focused = i == self.focused;
                let label = if field.required {
                    format!("{}*", field.label)
                } else {
                    field.label.clone()
                };
                let value = if focused {
                    format!("{}_", field.value)
                } else {
                    field.value.clone()
                };
                let value_style = if focused {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(vec![
                    Span::styled(
                        if focused { "> " } else { "  " },
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!("{:width$} ", label, width = width),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(value, value_style),
                ])
            })
            .collect();

        if let Some(error) = &self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Tab/↓ ", Style::default().fg(Color::Cyan)),
            Span::raw("Next  "),
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Save  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel  "),
            Span::styled(" * ", Style::default().fg(Color::Cyan)),
            Span::raw("required"),
        ]));
        lines
    }
}

impl Component for FormDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SubmitForm(self.fields.clone())),
            KeyCode::Tab | KeyCode::Down => {
                let next = if self.focused + 1 >= self.fields.len() {
                    0
                } else {
                    self.focused + 1
                };
                self.focus(next);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                let prev = if self.focused == 0 {
                    self.fields.len().saturating_sub(1)
                } else {
                    self.focused - 1
                };
                self.focus(prev);
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.current() {
                    field.value.clear();
                }
                None
            }
            KeyCode::Backspace => {
                if let Some(field) = self.current() {
                    field.value.pop();
                }
                None
            }
            KeyCode::Char(c) => {
                self.error = None;
                if let Some(field) = self.current() {
                    field.value.push(c);
                }
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let lines = self.lines();
        let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let width = 70.min(area.width.saturating_sub(4));
        let popup_area = centered_popup(area, width, height);

        // Keep the focused field on screen
        let inner_height = height.saturating_sub(2);
        let focused = self.focused as u16;
        if focused < self.scroll {
            self.scroll = focused;
        } else if inner_height > 0 && focused >= self.scroll + inner_height {
            self.scroll = focused + 1 - inner_height;
        }

        frame.render_widget(Clear, popup_area);
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
