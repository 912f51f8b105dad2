//! Column visibility dialog component

use super::grid_view::ColumnInfo;
use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Checklist of every column in the active grid, hidden ones included
pub struct ColumnsDialog {
    columns: Vec<ColumnInfo>,
    list_state: ListState,
}

impl Default for ColumnsDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnsDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            columns: Vec::new(),
            list_state,
        }
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnInfo>) {
        let selected = self
            .list_state
            .selected()
            .unwrap_or(0)
            .min(columns.len().saturating_sub(1));
        self.columns = columns;
        self.list_state.select(Some(selected));
    }

    fn selected(&self) -> Option<&ColumnInfo> {
        self.columns.get(self.list_state.selected()?)
    }

    fn toggle(&mut self) -> Option<Action> {
        let index = self.list_state.selected()?;
        let column = self.columns.get_mut(index)?;
        // Reflect the change right away; the grid is the source of truth on
        // the next `set_columns`
        column.visible = !column.visible;
        Some(Action::ToggleColumn(column.key.clone()))
    }
}

impl Component for ColumnsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle(),
            KeyCode::Up | KeyCode::Char('k') => {
                let index = self.list_state.selected().unwrap_or(0).saturating_sub(1);
                self.list_state.select(Some(index));
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.columns.len().saturating_sub(1);
                let index = (self.list_state.selected().unwrap_or(0) + 1).min(last);
                self.list_state.select(Some(index));
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = (self.columns.len() as u16 + 5)
            .max(8)
            .min(area.height);
        let popup_area = centered_popup(area, 40, height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(popup_area);

        let items: Vec<ListItem> = self
            .columns
            .iter()
            .map(|c| {
                let (check, style) = if c.visible {
                    ("[x] ", Style::default().fg(Color::White))
                } else {
                    ("[ ] ", Style::default().fg(Color::DarkGray))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(check, Style::default().fg(Color::Green)),
                    Span::styled(c.header.clone(), style),
                ]))
            })
            .collect();

        let visible = self.columns.iter().filter(|c| c.visible).count();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Columns ({}/{}) ", visible, self.columns.len()))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let hint = match self.selected() {
            Some(c) if c.visible => " Space hide  Esc close ",
            _ => " Space show  Esc close ",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
            chunks[1],
        );
        Ok(())
    }
}
