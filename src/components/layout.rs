//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub tabs: Rect,
    pub content: Rect,
    pub detail: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// Tabs on top, then the content area (grid plus optional detail panel on the
/// right), a one-line status bar and the help bar.
pub fn calculate_main_layout(area: Rect, show_detail: bool) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let (content, detail) = if show_detail {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[1]);
        (chunks[0], Some(chunks[1]))
    } else {
        (main_chunks[1], None)
    };

    MainLayout {
        tabs: main_chunks[0],
        content,
        detail,
        status: main_chunks[2],
        help: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_popup(area, 40, 10);
        assert_eq!(popup, Rect::new(30, 15, 40, 10));

        let small = centered_popup(Rect::new(0, 0, 20, 5), 40, 10);
        assert_eq!(small, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_main_layout_detail_split() {
        let layout = calculate_main_layout(Rect::new(0, 0, 100, 40), true);
        assert_eq!(layout.tabs.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.help.height, 3);
        let detail = layout.detail.unwrap();
        assert_eq!(layout.content.width + detail.width, 100);

        let layout = calculate_main_layout(Rect::new(0, 0, 100, 40), false);
        assert!(layout.detail.is_none());
        assert_eq!(layout.content.width, 100);
    }
}
