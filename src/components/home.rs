//! Home component - Main application screen
//!
//! Tab bar, the active resource grid (or dashboard), the detail panel, a
//! status line and the help bar. Owns tab and search-mode state; the grids
//! themselves are owned by the App.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, DetailComponent};
use crate::model::notification::{Notification, NotificationLevel};
use crate::model::ui::Tab;
use crate::model::Platform;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
pub struct HomeComponent {
    /// Current active tab
    pub active_tab: Tab,

    /// Whether keystrokes go to the search box of the active grid
    pub search_mode: bool,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Dashboard,
            search_mode: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn next_tab(&mut self) {
        self.select_tab(self.active_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.active_tab.previous());
    }

    /// Switch tabs, leaving search mode
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.search_mode = false;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_search_mode(&mut self) {
        // The dashboard has nothing to search
        self.search_mode = self.active_tab != Tab::Dashboard;
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    /// Screen-level keys. `None` means the key belongs to the active grid.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let tab = self.active_tab;
        let action = match key.code {
            // Tabs
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                Tab::all().get(index).copied().map(Action::SelectTab)
            }

            // Detail panel
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDetailDown)
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDetailUp)
            }

            // Platform
            KeyCode::Char('p') => Some(Action::NextPlatform),
            KeyCode::Char('P') => Some(Action::PrevPlatform),

            // Records
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('n') if tab.supports_create() => Some(Action::OpenNewRecord),
            KeyCode::Char('e') if tab == Tab::Profiles => Some(Action::OpenEditProfile),
            KeyCode::Char('d') if tab.supports_delete() => Some(Action::OpenDeleteConfirm),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextTab => self.next_tab(),
            Action::PrevTab => self.previous_tab(),
            Action::SelectTab(tab) => self.select_tab(tab),
            Action::EnterSearchMode => self.enter_search_mode(),
            Action::ExitSearchMode => self.exit_search_mode(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub platform: Platform,
    pub api_url: &'a str,
    pub authenticated: bool,
    /// Search term of the active grid
    pub search: &'a str,
    pub notification: Option<&'a Notification>,
    pub loaded_at: Option<String>,
    pub loading: bool,
    pub in_flight: usize,
}

/// Draw the home screen around the active content component
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &HomeComponent,
    content: &mut dyn Component,
    detail: Option<&mut DetailComponent>,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, detail.is_some());

    render_tabs(frame, layout.tabs, home, ctx);
    content.draw(frame, layout.content)?;
    if let (Some(detail), Some(detail_area)) = (detail, layout.detail) {
        detail.draw(frame, detail_area)?;
    }
    render_status_bar(frame, layout.status, home, ctx);
    render_help_bar(frame, layout.help, home, ctx);

    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let all_tabs = Tab::all();
    let titles: Vec<String> = all_tabs
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.name()))
        .collect();
    let selected = all_tabs
        .iter()
        .position(|t| *t == home.active_tab)
        .unwrap_or(0);

    let platform_style = if home.active_tab.is_platform_scoped() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(
                    Line::from(Span::styled(format!(" {} ", ctx.platform), platform_style))
                        .alignment(Alignment::Right),
                ),
        )
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let mut spans = vec![Span::styled(
        format!(" {} ", ctx.api_url),
        Style::default()
            .fg(Color::Black)
            .bg(if ctx.authenticated {
                Color::Cyan
            } else {
                Color::Yellow
            })
            .add_modifier(Modifier::BOLD),
    )];
    if !ctx.authenticated {
        spans.push(Span::styled(
            " no token ",
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw(" "));

    if ctx.loading {
        spans.push(Span::styled(
            format!("Loading {}... ", home.active_tab.name()),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(at) = &ctx.loaded_at {
        spans.push(Span::styled(
            format!("Updated {} ", at),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if ctx.in_flight > 0 {
        spans.push(Span::styled(
            format!("[{} running] ", ctx.in_flight),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(notification) = ctx.notification {
        let color = match notification.level {
            NotificationLevel::Info => Color::Cyan,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!(" {} ", notification.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    } else if !ctx.search.is_empty() && !home.search_mode {
        spans.push(Span::styled(
            format!("Search: {}", ctx.search),
            Style::default().fg(Color::Cyan),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_span(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn help_spans(home: &HomeComponent, search: &str) -> Vec<Span<'static>> {
    if home.search_mode {
        return vec![
            key_span("Esc/Enter", Color::Yellow),
            Span::raw("Done  "),
            key_span("Ctrl+u", Color::Yellow),
            Span::raw("Clear  "),
            Span::styled(format!("Search: {}_", search), Style::default().fg(Color::Cyan)),
        ];
    }

    let mut spans = vec![
        key_span("q", Color::Yellow),
        Span::raw("Quit "),
        key_span("?", Color::White),
        Span::raw("Help "),
        key_span("Tab", Color::Cyan),
        Span::raw("Tabs "),
        key_span("r", Color::Green),
        Span::raw("Reload "),
    ];

    if home.active_tab.is_platform_scoped() {
        spans.push(key_span("p/P", Color::Cyan));
        spans.push(Span::raw("Platform "));
    }

    if home.active_tab != Tab::Dashboard {
        spans.extend([
            key_span("/", Color::Cyan),
            Span::raw("Search "),
            key_span("s", Color::Cyan),
            Span::raw("Sort "),
            key_span("f", Color::Cyan),
            Span::raw("Filter "),
            key_span("v", Color::Cyan),
            Span::raw("Columns "),
            key_span("[ ]", Color::Cyan),
            Span::raw("Page "),
            key_span("x", Color::Magenta),
            Span::raw("Export "),
        ]);
    }

    if home.active_tab.supports_create() {
        spans.push(key_span("n", Color::Green));
        spans.push(Span::raw("New "));
        spans.push(key_span("d", Color::Red));
        spans.push(Span::raw("Delete "));
    }
    if home.active_tab == Tab::Profiles {
        spans.push(key_span("e", Color::Green));
        spans.push(Span::raw("Edit "));
    }
    spans
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let paragraph = Paragraph::new(Line::from(help_spans(home, ctx.search)))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tab_level_keys() {
        let mut home = HomeComponent::new();
        assert_eq!(home.handle_key_event(key(KeyCode::Tab)).unwrap(), Some(Action::NextTab));
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('3'))).unwrap(),
            Some(Action::SelectTab(Tab::Profiles))
        );
        assert_eq!(home.handle_key_event(key(KeyCode::Char('7'))).unwrap(), None);
        // Grid keys fall through
        assert_eq!(home.handle_key_event(key(KeyCode::Char('s'))).unwrap(), None);
    }

    #[test]
    fn test_record_keys_depend_on_tab() {
        let mut home = HomeComponent::new();
        home.select_tab(Tab::Devices);
        assert_eq!(home.handle_key_event(key(KeyCode::Char('n'))).unwrap(), None);
        assert_eq!(home.handle_key_event(key(KeyCode::Char('e'))).unwrap(), None);

        home.select_tab(Tab::Groups);
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('n'))).unwrap(),
            Some(Action::OpenNewRecord)
        );
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('d'))).unwrap(),
            Some(Action::OpenDeleteConfirm)
        );

        home.select_tab(Tab::Profiles);
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('e'))).unwrap(),
            Some(Action::OpenEditProfile)
        );
    }

    #[test]
    fn test_search_mode_not_on_dashboard() {
        let mut home = HomeComponent::new();
        home.update(Action::EnterSearchMode).unwrap();
        assert!(!home.search_mode);

        home.update(Action::NextTab).unwrap();
        home.update(Action::EnterSearchMode).unwrap();
        assert!(home.search_mode);

        home.update(Action::NextTab).unwrap();
        assert!(!home.search_mode);
    }
}
