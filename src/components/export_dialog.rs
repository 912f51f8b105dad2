//! Export format picker

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::grid::ExportFormat;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Lists every export format, marking the ones the active grid has no
/// formatter for
#[derive(Default)]
pub struct ExportDialog {
    selected: usize,
    /// Formats with a registered formatter
    available: Vec<ExportFormat>,
    rows: usize,
}

impl ExportDialog {
    pub fn set_context(&mut self, available: Vec<ExportFormat>, rows: usize) {
        self.available = available;
        self.rows = rows;
        self.selected = 0;
    }

    fn selected_format(&self) -> ExportFormat {
        let formats = ExportFormat::all();
        formats[self.selected.min(formats.len() - 1)]
    }
}

impl Component for ExportDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let count = ExportFormat::all().len();
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('c') => Some(Action::Export(ExportFormat::Csv)),
            KeyCode::Char('p') => Some(Action::Export(ExportFormat::Pdf)),
            KeyCode::Enter => Some(Action::Export(self.selected_format())),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(count - 1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 44, 9);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} rows, visible columns only", self.rows),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];

        for (i, format) in ExportFormat::all().into_iter().enumerate() {
            let available = self.available.contains(&format);
            let marker = if i == self.selected { "▶ " } else { "  " };
            let style = match (i == self.selected, available) {
                (true, _) => Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            let mut spans = vec![Span::styled(
                format!("{}{} (.{})", marker, format, format.extension()),
                style,
            )];
            if !available {
                spans.push(Span::styled(
                    "  not available",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Export  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Export ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_select_and_export() {
        let mut dialog = ExportDialog::default();
        dialog.set_context(vec![ExportFormat::Csv], 12);

        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Export(ExportFormat::Csv))
        );
        dialog.handle_key_event(key(KeyCode::Down)).unwrap();
        dialog.handle_key_event(key(KeyCode::Down)).unwrap();
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::Export(ExportFormat::Pdf))
        );
    }
}
