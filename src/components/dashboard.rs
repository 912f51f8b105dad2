//! Dashboard tab
//!
//! Fleet-wide device counts by status and platform plus the compliance rate.

use crate::action::Action;
use crate::component::Component;
use crate::model::{DashboardSummary, DeviceStatus};
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

const BAR_WIDTH: usize = 30;

#[derive(Default)]
pub struct DashboardComponent {
    summary: Option<DashboardSummary>,
    loading: bool,
}

impl DashboardComponent {
    pub fn set_summary(&mut self, summary: Option<DashboardSummary>) {
        self.summary = summary;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

fn status_color(status: DeviceStatus) -> Color {
    match status {
        DeviceStatus::Online => Color::Green,
        DeviceStatus::Offline => Color::DarkGray,
        DeviceStatus::Pending => Color::Yellow,
        DeviceStatus::Lost => Color::Red,
        DeviceStatus::Unknown => Color::Gray,
    }
}

/// `count` as a bar scaled against `max`, at least one cell when non-zero
fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let cells = (count * BAR_WIDTH).div_ceil(max).clamp(1, BAR_WIDTH);
    "█".repeat(cells)
}

fn count_line(label: String, count: usize, max: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), Style::default().fg(Color::White)),
        Span::styled(format!("{:>6} ", count), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(bar(count, max), Style::default().fg(color)),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

impl DashboardComponent {
    fn lines(&self, summary: &DashboardSummary) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(" Devices ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    summary.total.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Low battery ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    summary.low_battery.to_string(),
                    if summary.low_battery > 0 {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ]),
            Line::from(""),
            section("By status"),
        ];

        for status in DeviceStatus::all() {
            lines.push(count_line(
                format!("{} {}", status.icon(), status),
                summary.status_count(status),
                summary.total,
                status_color(status),
            ));
        }

        lines.push(Line::from(""));
        lines.push(section("By platform"));
        for (platform, count) in &summary.by_platform {
            lines.push(count_line(platform.to_string(), *count, summary.total, Color::Cyan));
        }
        lines
    }
}

impl Component for DashboardComponent {
    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = if self.loading {
            " Fleet Overview ⟳ "
        } else {
            " Fleet Overview "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(summary) = &self.summary else {
            let message = if self.loading {
                "Loading..."
            } else {
                "No data yet. Press 'r' to load."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return Ok(());
        };

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let (ratio, label) = match summary.compliance_rate() {
            Some(rate) => (rate / 100.0, format!("{:.1}% compliant", rate)),
            None => (0.0, "no devices".to_string()),
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Compliance "))
            .gauge_style(Style::default().fg(if ratio >= 0.9 {
                Color::Green
            } else if ratio >= 0.6 {
                Color::Yellow
            } else {
                Color::Red
            }))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, chunks[0]);

        frame.render_widget(Paragraph::new(self.lines(summary)), chunks[1]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Device;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 1000).chars().count(), 1);
        assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_draw_summary() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[
                {"id": "a", "name": "a", "platform": "ios", "status": "online", "compliant": true},
                {"id": "b", "name": "b", "platform": "android", "status": "lost"}
            ]"#,
        )
        .unwrap();
        let mut dashboard = DashboardComponent::default();
        dashboard.set_summary(Some(DashboardSummary::from_devices(&devices)));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                dashboard.draw(frame, area).unwrap();
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("50.0% compliant"));
        assert!(screen.contains("By platform"));
    }
}
