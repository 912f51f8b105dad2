//! Column filter dialog component
//!
//! Two steps: pick a filterable column, then one of its values. The first
//! entry of the value list clears the filter.

use super::grid_view::ColumnInfo;
use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::grid::FILTER_ALL;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Column,
    /// Index into `columns` of the column being filtered
    Value(usize),
}

/// Column filter dialog
pub struct ColumnFilterDialog {
    columns: Vec<ColumnInfo>,
    /// Values per filterable column key
    options: Vec<Vec<String>>,
    step: Step,
    list_state: ListState,
}

impl Default for ColumnFilterDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnFilterDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            columns: Vec::new(),
            options: Vec::new(),
            step: Step::Column,
            list_state,
        }
    }

    /// Load the filterable columns of the active grid and reset to step one
    pub fn set_columns<F>(&mut self, columns: Vec<ColumnInfo>, mut options_for: F)
    where
        F: FnMut(&str) -> Vec<String>,
    {
        self.columns = columns.into_iter().filter(|c| c.filterable).collect();
        self.options = self.columns.iter().map(|c| options_for(&c.key)).collect();
        self.step = Step::Column;
        self.list_state.select(Some(0));
    }

    fn len(&self) -> usize {
        match self.step {
            Step::Column => self.columns.len(),
            // +1 for the "all" entry
            Step::Value(column) => self.options[column].len() + 1,
        }
    }

    fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    fn select_next(&mut self) {
        let len = self.len();
        if len > 0 {
            self.list_state.select(Some((self.selected() + 1).min(len - 1)));
        }
    }

    fn select_prev(&mut self) {
        self.list_state.select(Some(self.selected().saturating_sub(1)));
    }

    fn confirm(&mut self) -> Option<Action> {
        match self.step {
            Step::Column => {
                let index = self.selected();
                let column = self.columns.get(index)?;
                // Start on the active value, if any
                let position = column
                    .filter
                    .as_ref()
                    .and_then(|f| self.options[index].iter().position(|o| o == f))
                    .map(|p| p + 1)
                    .unwrap_or(0);
                self.step = Step::Value(index);
                self.list_state.select(Some(position));
                None
            }
            Step::Value(column) => {
                let value = match self.selected() {
                    0 => FILTER_ALL.to_string(),
                    n => self.options[column].get(n - 1)?.clone(),
                };
                Some(Action::SetColumnFilter {
                    column: self.columns[column].key.clone(),
                    value,
                })
            }
        }
    }

    fn back(&mut self) -> Option<Action> {
        match self.step {
            Step::Column => Some(Action::CloseModal),
            Step::Value(column) => {
                self.step = Step::Column;
                self.list_state.select(Some(column));
                None
            }
        }
    }

    fn items(&self) -> Vec<ListItem<'static>> {
        let marker = |active: bool| {
            Span::styled(
                if active { "● " } else { "  " },
                Style::default().fg(Color::Green),
            )
        };

        match self.step {
            Step::Column => self
                .columns
                .iter()
                .map(|c| {
                    let mut spans = vec![
                        marker(c.filter.is_some()),
                        Span::styled(c.header.clone(), Style::default().fg(Color::White)),
                    ];
                    if let Some(filter) = &c.filter {
                        spans.push(Span::styled(
                            format!("  = {}", filter),
                            Style::default().fg(Color::Yellow),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect(),
            Step::Value(column) => {
                let current = self.columns[column].filter.as_deref();
                let mut items = vec![ListItem::new(Line::from(vec![
                    marker(current.is_none()),
                    Span::styled("All values", Style::default().fg(Color::DarkGray)),
                ]))];
                items.extend(self.options[column].iter().map(|value| {
                    let is_current = current == Some(value.as_str());
                    let style = if is_current {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Line::from(vec![
                        marker(is_current),
                        Span::styled(value.clone(), style),
                    ]))
                }));
                items
            }
        }
    }
}

impl Component for ColumnFilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => self.back(),
            KeyCode::Char('f') => Some(Action::CloseModal),
            KeyCode::Enter | KeyCode::Char('l') => self.confirm(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content_height = self.len().max(3) as u16 + 2;
        let popup_height = (content_height + 6).min(area.height.saturating_sub(4)).max(12);
        let popup_area = centered_popup(area, 50.min(area.width.saturating_sub(4)), popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(popup_area);

        let header_text = match self.step {
            Step::Column => "Choose a column".to_string(),
            Step::Value(column) => format!("Filter {} by", self.columns[column].header),
        };
        let header = Paragraph::new(Span::styled(header_text, Style::default().fg(Color::Cyan)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Filter ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
        frame.render_widget(header, chunks[0]);

        if self.columns.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "This grid has no filterable columns",
                Style::default().fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, chunks[1]);
        } else {
            let list = List::new(self.items())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let help_text = vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Select  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Back"),
        ];
        let help = Paragraph::new(Line::from(help_text))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn column(key: &str, filterable: bool, filter: Option<&str>) -> ColumnInfo {
        ColumnInfo {
            key: key.to_string(),
            header: key.to_uppercase(),
            visible: true,
            filterable,
            filter: filter.map(String::from),
        }
    }

    fn dialog() -> ColumnFilterDialog {
        let mut dialog = ColumnFilterDialog::new();
        dialog.set_columns(
            vec![
                column("name", false, None),
                column("status", true, Some("lost")),
                column("kind", true, None),
            ],
            |key| match key {
                "status" => vec!["lost".to_string(), "online".to_string()],
                _ => vec!["apt".to_string()],
            },
        );
        dialog
    }

    fn press(dialog: &mut ColumnFilterDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_only_filterable_columns_listed() {
        let dialog = dialog();
        assert_eq!(dialog.len(), 2);
    }

    #[test]
    fn test_pick_value() {
        let mut dialog = dialog();
        press(&mut dialog, KeyCode::Down);
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
        assert_eq!(press(&mut dialog, KeyCode::Down), None);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetColumnFilter {
                column: "kind".to_string(),
                value: "apt".to_string()
            })
        );
    }

    #[test]
    fn test_value_step_starts_on_active_filter_and_can_clear() {
        let mut dialog = dialog();
        press(&mut dialog, KeyCode::Enter);
        assert_eq!(dialog.selected(), 1);

        press(&mut dialog, KeyCode::Up);
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetColumnFilter {
                column: "status".to_string(),
                value: FILTER_ALL.to_string()
            })
        );
    }

    #[test]
    fn test_escape_goes_back_then_closes() {
        let mut dialog = dialog();
        press(&mut dialog, KeyCode::Enter);
        assert_eq!(press(&mut dialog, KeyCode::Esc), None);
        assert_eq!(dialog.step, Step::Column);
        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::CloseModal));
    }
}
