//! Grid view component
//!
//! Draws a `DataGrid` as a ratatui table with sort and filter markers in the
//! header and a paging footer. Keys and header-border drags become grid
//! operations.

use super::detail::Describe;
use crate::action::Action;
use crate::component::Component;
use crate::grid::{Align, DataGrid, ExportFormat, GridMode, GridRecord};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
    Frame,
};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

/// Rows-per-page steps for `+` / `-`
pub const PAGE_SIZES: [usize; 6] = [5, 10, 20, 25, 50, 100];

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const COLUMN_SPACING: u16 = 1;

/// Column summary for the filter and visibility dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub key: String,
    pub header: String,
    pub visible: bool,
    pub filterable: bool,
    pub filter: Option<String>,
}

/// Right edge of a header cell as drawn last frame
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderBorder {
    key: String,
    x: u16,
}

/// Next page size step up or down from `current`
pub fn step_page_size(current: usize, grow: bool) -> usize {
    if grow {
        PAGE_SIZES
            .iter()
            .copied()
            .find(|&size| size > current)
            .unwrap_or(current)
    } else {
        PAGE_SIZES
            .iter()
            .rev()
            .copied()
            .find(|&size| size < current)
            .unwrap_or(current)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Grid Panel
// ═══════════════════════════════════════════════════════════════════════════════

/// Record-type independent view of a grid component, so the app can drive
/// whichever grid belongs to the active tab
pub trait GridPanel: Component {
    fn title(&self) -> &str;

    fn search(&self) -> &str;

    /// Rows matching the current query, across all pages
    fn total_rows(&self) -> usize;

    fn columns(&self) -> Vec<ColumnInfo>;

    fn filter_options(&self, key: &str) -> Vec<String>;

    fn has_exporter(&self, format: ExportFormat) -> bool;

    fn export(&mut self, format: ExportFormat) -> Result<String>;

    /// (record key, label) of the highlighted row
    fn selected_record(&self) -> Option<(String, String)>;

    /// Title and label/value pairs for the detail panel
    fn selected_detail(&self) -> Option<(String, Vec<(String, String)>)>;

    fn set_loading(&mut self, loading: bool);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Grid View
// ═══════════════════════════════════════════════════════════════════════════════

pub struct GridView<T> {
    pub grid: DataGrid<T>,
    /// Index into the visible columns
    focused: usize,
    table_state: TableState,
    /// Filter choices that don't come from the loaded records (server mode
    /// only ever sees one page)
    fixed_options: HashMap<String, Vec<String>>,
    borders: Vec<HeaderBorder>,
    header_y: Option<u16>,
    loading: bool,
}

impl<T: GridRecord + Describe> GridView<T> {
    pub fn new(grid: DataGrid<T>) -> Self {
        Self {
            grid,
            focused: 0,
            table_state: TableState::default(),
            fixed_options: HashMap::new(),
            borders: Vec::new(),
            header_y: None,
            loading: false,
        }
    }

    pub fn with_filter_options(mut self, key: &str, options: Vec<String>) -> Self {
        self.fixed_options.insert(key.to_string(), options);
        self
    }

    /// Replace a fixed option list once its source has loaded
    pub fn set_filter_options(&mut self, key: &str, options: Vec<String>) {
        self.fixed_options.insert(key.to_string(), options);
    }

    pub fn set_records(&mut self, records: Vec<T>) {
        self.grid.set_records(records);
        self.clamp_selection();
    }

    pub fn set_server_page(&mut self, records: Vec<T>, total_rows: usize) {
        self.grid.set_server_page(records, total_rows);
        self.clamp_selection();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Focus & Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn focused_key(&self) -> Option<String> {
        let columns = self.grid.visible_columns();
        let index = self.focused.min(columns.len().saturating_sub(1));
        columns.get(index).map(|c| c.key.clone())
    }

    fn focus_next_column(&mut self) {
        let count = self.grid.visible_columns().len();
        self.focused = (self.focused + 1).min(count.saturating_sub(1));
    }

    fn focus_prev_column(&mut self) {
        let count = self.grid.visible_columns().len();
        self.focused = self.focused.min(count.saturating_sub(1)).saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&T> {
        let index = self.table_state.selected()?;
        self.grid.page_rows().get(index).copied()
    }

    /// Keep the highlighted row on the page
    fn clamp_selection(&mut self) {
        let rows = self.grid.page_rows().len();
        if rows == 0 {
            self.table_state.select(None);
        } else {
            let index = self.table_state.selected().unwrap_or(0).min(rows - 1);
            self.table_state.select(Some(index));
        }
    }

    fn select_row(&mut self, index: usize) {
        let rows = self.grid.page_rows().len();
        if rows > 0 {
            self.table_state.select(Some(index.min(rows - 1)));
        }
    }

    fn select_next(&mut self) {
        let next = self.table_state.selected().map(|i| i + 1).unwrap_or(0);
        self.select_row(next);
    }

    fn select_prev(&mut self) {
        let prev = self.table_state.selected().unwrap_or(0).saturating_sub(1);
        self.select_row(prev);
    }

    /// View changed underneath the cursor; start from the top
    fn reset_selection(&mut self) {
        self.table_state.select(Some(0));
        self.clamp_selection();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Column Widths
    // ─────────────────────────────────────────────────────────────────────────

    /// Keyboard resize of the focused column, as a one-step drag
    fn nudge_focused_width(&mut self, delta: i32) {
        let Some(key) = self.focused_key() else {
            return;
        };
        if self.grid.begin_resize(&key, 0) {
            self.grid.resize_column(&key, delta);
            self.grid.end_resize();
        }
    }

    /// Header border under the pointer, one cell of slack to the left
    fn border_at(&self, x: u16, y: u16) -> Option<String> {
        if self.header_y != Some(y) {
            return None;
        }
        self.borders
            .iter()
            .find(|b| b.x == x || b.x == x + 1)
            .map(|b| b.key.clone())
    }

    /// Recompute header border positions for the given table area
    fn layout_borders(&mut self, inner: Rect) {
        self.header_y = Some(inner.y);
        self.borders.clear();

        let mut x = inner.x + HIGHLIGHT_SYMBOL.width() as u16;
        let right = inner.x + inner.width;
        for column in self.grid.visible_columns() {
            let end = x + self.grid.column_width(&column.key);
            if end > right {
                break;
            }
            self.borders.push(HeaderBorder {
                key: column.key.clone(),
                x: end,
            });
            x = end + COLUMN_SPACING;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn header_row(&self) -> Row<'static> {
        let focused = self.focused_key();
        let state = self.grid.state();

        let cells: Vec<Cell> = self
            .grid
            .visible_columns()
            .into_iter()
            .map(|column| {
                let mut text = column.header.clone();
                if let Some(sort) = state.sort.as_ref().filter(|s| s.column == column.key) {
                    text.push(' ');
                    text.push_str(sort.direction.arrow());
                }
                if state.filters.contains_key(&column.key) {
                    text.push('*');
                }

                let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if focused.as_deref() == Some(column.key.as_str()) {
                    style = style.add_modifier(Modifier::UNDERLINED).fg(Color::Yellow);
                }
                Cell::from(Line::from(text).alignment(alignment(column.align))).style(style)
            })
            .collect();

        Row::new(cells)
    }

    fn body_rows(&self) -> Vec<Row<'static>> {
        let columns = self.grid.visible_columns();
        self.grid
            .page_rows()
            .into_iter()
            .map(|record| {
                let cells: Vec<Cell> = columns
                    .iter()
                    .map(|c| Cell::from(Line::from(c.display(record)).alignment(alignment(c.align))))
                    .collect();
                Row::new(cells)
            })
            .collect()
    }

    fn footer_line(&self) -> Line<'static> {
        let state = self.grid.state();
        let key_style = Style::default().fg(Color::DarkGray);
        let value_style = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled(" Page ", key_style),
            Span::styled(
                format!("{}/{}", state.page, self.grid.total_pages()),
                value_style,
            ),
            Span::styled("  Rows ", key_style),
            Span::styled(self.grid.total_rows().to_string(), value_style),
            Span::styled("  Per page ", key_style),
            Span::styled(state.page_size.to_string(), value_style),
        ];

        if let Some(sort) = &state.sort {
            spans.push(Span::styled("  Sort ", key_style));
            spans.push(Span::styled(
                format!("{} {}", sort.column, sort.direction.arrow()),
                value_style,
            ));
        }
        if !state.filters.is_empty() {
            let filters: Vec<String> = state
                .filters
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            spans.push(Span::styled("  Filter ", key_style));
            spans.push(Span::styled(filters.join(" "), Style::default().fg(Color::Yellow)));
        }
        if !state.search.is_empty() {
            spans.push(Span::styled("  Search ", key_style));
            spans.push(Span::styled(
                format!("/{}", state.search),
                Style::default().fg(Color::Cyan),
            ));
        }
        if matches!(self.grid.mode(), GridMode::Server { .. }) {
            spans.push(Span::styled("  (server)", key_style));
        }

        Line::from(spans)
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl<T: GridRecord + Describe> Component for GridView<T> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::FocusPrevColumn),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::FocusNextColumn),
            KeyCode::Char('s') => Some(Action::SortFocused),
            KeyCode::Char('S') => Some(Action::ClearSort),
            KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::GrowPageSize),
            KeyCode::Char('-') => Some(Action::ShrinkPageSize),
            KeyCode::Char('>') => Some(Action::WidenColumn),
            KeyCode::Char('<') => Some(Action::NarrowColumn),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('f') => Some(Action::OpenColumnFilter),
            KeyCode::Char('F') => Some(Action::ClearFilters),
            KeyCode::Char('v') => Some(Action::OpenColumnVisibility),
            KeyCode::Char('x') => Some(Action::OpenExport),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.select_next(),
            Action::PrevItem => self.select_prev(),
            Action::FirstItem => self.select_row(0),
            Action::LastItem => self.select_row(usize::MAX),
            Action::FocusNextColumn => self.focus_next_column(),
            Action::FocusPrevColumn => self.focus_prev_column(),
            Action::SortFocused => {
                if let Some(key) = self.focused_key() {
                    self.grid.set_sort(&key);
                    self.reset_selection();
                }
            }
            Action::ClearSort => {
                self.grid.clear_sort();
                self.reset_selection();
            }
            Action::NextPage => {
                self.grid.next_page();
                self.reset_selection();
            }
            Action::PrevPage => {
                self.grid.previous_page();
                self.reset_selection();
            }
            Action::GrowPageSize | Action::ShrinkPageSize => {
                let grow = action == Action::GrowPageSize;
                let size = step_page_size(self.grid.state().page_size, grow);
                self.grid.set_page_size(size);
                self.clamp_selection();
            }
            Action::WidenColumn => self.nudge_focused_width(1),
            Action::NarrowColumn => self.nudge_focused_width(-1),
            Action::SearchInput(c) => {
                let mut term = self.grid.state().search.clone();
                term.push(c);
                self.grid.set_search(term);
                self.reset_selection();
            }
            Action::SearchBackspace => {
                let mut term = self.grid.state().search.clone();
                if term.pop().is_some() {
                    self.grid.set_search(term);
                    self.reset_selection();
                }
            }
            Action::ClearSearch => {
                if !self.grid.state().search.is_empty() {
                    self.grid.set_search(String::new());
                    self.reset_selection();
                }
            }
            Action::SetColumnFilter { column, value } => {
                self.grid.set_column_filter(&column, &value);
                self.reset_selection();
            }
            Action::ClearFilters => {
                if !self.grid.state().filters.is_empty() {
                    self.grid.clear_filters();
                    self.reset_selection();
                }
            }
            Action::ToggleColumn(key) => {
                self.grid.toggle_column_visibility(&key);
                let count = self.grid.visible_columns().len();
                self.focused = self.focused.min(count.saturating_sub(1));
            }
            Action::MouseDown(x, y) => {
                if let Some(key) = self.border_at(x, y) {
                    self.grid.begin_resize(&key, i32::from(x));
                }
            }
            Action::MouseDrag(x) => {
                self.grid.drag_to(i32::from(x));
            }
            Action::MouseUp => self.grid.end_resize(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let mut title = format!(" {} ({}) ", self.grid.title(), self.grid.total_rows());
        if self.loading {
            title.push_str("⟳ ");
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(chunks[0]);

        let widths: Vec<Constraint> = self
            .grid
            .visible_columns()
            .into_iter()
            .map(|c| Constraint::Length(self.grid.column_width(&c.key)))
            .collect();

        if widths.is_empty() {
            let paragraph = Paragraph::new("All columns are hidden. Press 'v' to show some.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, chunks[0]);
            self.borders.clear();
            self.header_y = None;
        } else {
            self.clamp_selection();
            self.layout_borders(inner);

            let table = Table::new(self.body_rows(), widths)
                .header(self.header_row())
                .block(block)
                .column_spacing(COLUMN_SPACING)
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(HIGHLIGHT_SYMBOL)
                .highlight_spacing(HighlightSpacing::Always);
            frame.render_stateful_widget(table, chunks[0], &mut self.table_state);

            if self.grid.is_empty_view() {
                let message = if self.loading {
                    "Loading..."
                } else {
                    self.grid.empty_message()
                };
                let body = Rect {
                    y: inner.y + 2,
                    height: inner.height.saturating_sub(2),
                    ..inner
                };
                let paragraph = Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(paragraph, body);
            }
        }

        frame.render_widget(Paragraph::new(self.footer_line()), chunks[1]);
        Ok(())
    }
}

impl<T: GridRecord + Describe> GridPanel for GridView<T> {
    fn title(&self) -> &str {
        self.grid.title()
    }

    fn search(&self) -> &str {
        &self.grid.state().search
    }

    fn total_rows(&self) -> usize {
        self.grid.total_rows()
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        let state = self.grid.state();
        self.grid
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                key: c.key.clone(),
                header: c.header.clone(),
                visible: self.grid.is_visible(&c.key),
                filterable: c.filterable,
                filter: state.filters.get(&c.key).cloned(),
            })
            .collect()
    }

    fn filter_options(&self, key: &str) -> Vec<String> {
        match self.fixed_options.get(key) {
            Some(options) => options.clone(),
            None => self.grid.filter_options(key),
        }
    }

    fn has_exporter(&self, format: ExportFormat) -> bool {
        self.grid.has_exporter(format)
    }

    fn export(&mut self, format: ExportFormat) -> Result<String> {
        self.grid.export_visible(format)
    }

    fn selected_record(&self) -> Option<(String, String)> {
        let record = self.selected()?;
        let index = self.table_state.selected().unwrap_or(0);
        Some((self.grid.row_key(record, index), record.label()))
    }

    fn selected_detail(&self) -> Option<(String, Vec<(String, String)>)> {
        self.selected().map(|r| (r.label(), r.describe()))
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::columns::group_columns;
    use crate::grid::{ExportFormatter, ExportTable, SortDirection};
    use crate::model::DeviceGroup;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn group(id: &str, name: &str, devices: u32) -> DeviceGroup {
        DeviceGroup {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            device_count: devices,
        }
    }

    fn view(count: usize) -> GridView<DeviceGroup> {
        let grid = DataGrid::new(group_columns(), 10)
            .with_title("Groups")
            .with_empty_message("No groups yet");
        let mut view = GridView::new(grid);
        view.set_records(
            (0..count)
                .map(|i| group(&format!("g{}", i), &format!("group {:02}", i), i as u32))
                .collect(),
        );
        view
    }

    fn render(view: &mut GridView<DeviceGroup>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.draw(frame, area).unwrap();
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(view: &mut GridView<DeviceGroup>, c: char) {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        if let Some(action) = view.handle_key_event(key).unwrap() {
            view.update(action).unwrap();
        }
    }

    #[test]
    fn test_step_page_size() {
        assert_eq!(step_page_size(10, true), 20);
        assert_eq!(step_page_size(10, false), 5);
        assert_eq!(step_page_size(5, false), 5);
        assert_eq!(step_page_size(100, true), 100);
        assert_eq!(step_page_size(7, true), 10);
    }

    #[test]
    fn test_sort_follows_focused_column() {
        let mut view = view(3);
        press(&mut view, 'l');
        press(&mut view, 'l');
        assert_eq!(view.focused_key().as_deref(), Some("deviceCount"));

        press(&mut view, 's');
        press(&mut view, 's');
        let sort = view.grid.state().sort.clone().unwrap();
        assert_eq!(sort.column, "deviceCount");
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(view.selected().unwrap().name, "group 02");

        press(&mut view, 'S');
        assert!(view.grid.state().sort.is_none());
    }

    #[test]
    fn test_focus_stays_in_bounds() {
        let mut view = view(1);
        press(&mut view, 'h');
        assert_eq!(view.focused_key().as_deref(), Some("name"));
        for _ in 0..10 {
            press(&mut view, 'l');
        }
        assert_eq!(view.focused_key().as_deref(), Some("deviceCount"));

        view.update(Action::ToggleColumn("deviceCount".to_string())).unwrap();
        assert_eq!(view.focused_key().as_deref(), Some("description"));
    }

    #[test]
    fn test_paging_keys() {
        let mut view = view(25);
        press(&mut view, ']');
        press(&mut view, ']');
        press(&mut view, ']');
        assert_eq!(view.grid.state().page, 3);

        press(&mut view, '+');
        assert_eq!(view.grid.state().page_size, 20);
        assert_eq!(view.grid.state().page, 2);

        press(&mut view, 'G');
        assert_eq!(view.selected().unwrap().name, "group 24");
    }

    #[test]
    fn test_search_input_filters_and_selects_first() {
        let mut view = view(12);
        view.update(Action::SearchInput('1')).unwrap();
        view.update(Action::SearchInput('1')).unwrap();
        assert_eq!(view.grid.total_rows(), 1);
        assert_eq!(view.selected_record(), Some(("g11".to_string(), "group 11".to_string())));

        view.update(Action::SearchBackspace).unwrap();
        assert_eq!(view.search(), "1");
        view.update(Action::ClearSearch).unwrap();
        assert_eq!(view.grid.total_rows(), 12);
    }

    #[test]
    fn test_keyboard_resize_respects_min_width() {
        let mut view = view(1);
        let start = view.grid.column_width("name");
        press(&mut view, '>');
        assert_eq!(view.grid.column_width("name"), start + 1);
        for _ in 0..50 {
            press(&mut view, '<');
        }
        assert_eq!(view.grid.column_width("name"), 8);
        assert!(!view.grid.is_resizing());
    }

    #[test]
    fn test_draw_shows_headers_and_footer() {
        let mut view = view(3);
        view.update(Action::SortFocused).unwrap();
        let screen = render(&mut view);
        assert!(screen.contains("Groups (3)"));
        assert!(screen.contains("Name ▲"));
        assert!(screen.contains("group 00"));
        assert!(screen.contains("Page 1/1"));
    }

    #[test]
    fn test_draw_empty_message() {
        let mut view = view(0);
        let screen = render(&mut view);
        assert!(screen.contains("No groups yet"));

        view.set_loading(true);
        let screen = render(&mut view);
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn test_mouse_drag_resizes_column() {
        let mut view = view(2);
        render(&mut view);

        let border = view.borders[0].clone();
        assert_eq!(border.key, "name");
        let y = view.header_y.unwrap();
        let start = view.grid.column_width("name");

        view.update(Action::MouseDown(border.x, y)).unwrap();
        assert!(view.grid.is_resizing());
        view.update(Action::MouseDrag(border.x + 6)).unwrap();
        view.update(Action::MouseUp).unwrap();

        assert_eq!(view.grid.column_width("name"), start + 6);
        assert!(!view.grid.is_resizing());
    }

    #[test]
    fn test_mouse_down_off_border_does_nothing() {
        let mut view = view(2);
        render(&mut view);
        let y = view.header_y.unwrap();
        view.update(Action::MouseDown(view.borders[0].x + 5, y)).unwrap();
        assert!(!view.grid.is_resizing());
        view.update(Action::MouseDown(view.borders[0].x, y + 3)).unwrap();
        assert!(!view.grid.is_resizing());
    }

    struct Capture;

    impl ExportFormatter for Capture {
        fn export(&mut self, table: &ExportTable) -> Result<String> {
            Ok(format!("{} rows", table.rows.len()))
        }
    }

    #[test]
    fn test_export_through_panel() {
        let mut view = view(4);
        assert!(view.export(ExportFormat::Csv).is_err());
        view.grid.set_exporter(ExportFormat::Csv, Box::new(Capture));
        assert!(view.has_exporter(ExportFormat::Csv));
        assert_eq!(view.export(ExportFormat::Csv).unwrap(), "4 rows");
    }

    #[test]
    fn test_fixed_filter_options() {
        let view = view(2).with_filter_options("name", vec!["x".to_string()]);
        assert_eq!(view.filter_options("name"), vec!["x"]);
        assert_eq!(view.filter_options("description"), Vec::<String>::new());
    }
}
