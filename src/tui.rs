//! Terminal session: raw mode, alternate screen, and input polling

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Terminal input the console reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl Input {
    /// Keep key presses, mouse and resize; drop key releases/repeats
    /// (reported on Windows), focus and paste events
    pub fn from_event(event: Event) -> Option<Input> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
            Event::Mouse(mouse) => Some(Input::Mouse(mouse)),
            Event::Resize(w, h) => Some(Input::Resize(w, h)),
            _ => None,
        }
    }
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// How long `next_input` waits before the loop ticks
    pub tick_rate: Duration,
    /// Raw mode and the alternate screen are on
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            tick_rate: Duration::from_millis(100),
            active: false,
        })
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Take over the terminal
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        self.active = true;
        self.terminal.clear()?;
        Ok(())
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, cursor::Show)?;
        Ok(())
    }

    /// Wait up to one tick for input. `None` means the tick elapsed or the
    /// event was one the console ignores.
    pub fn next_input(&self) -> Result<Option<Input>> {
        if !event::poll(self.tick_rate)? {
            return Ok(None);
        }
        Ok(Input::from_event(event::read()?))
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // A panic or early return must not leave the shell in raw mode
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEventKind};

    fn key(kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_key_presses_are_input() {
        assert!(matches!(
            Input::from_event(key(KeyEventKind::Press)),
            Some(Input::Key(k)) if k.code == KeyCode::Char('r')
        ));
        assert_eq!(Input::from_event(key(KeyEventKind::Release)), None);
        assert_eq!(Input::from_event(key(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn test_mouse_and_resize_pass_through() {
        let mouse = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            Input::from_event(Event::Mouse(mouse)),
            Some(Input::Mouse(mouse))
        );
        assert_eq!(
            Input::from_event(Event::Resize(120, 40)),
            Some(Input::Resize(120, 40))
        );
        assert_eq!(Input::from_event(Event::FocusLost), None);
    }

    #[test]
    fn test_exit_before_enter_is_a_no_op() {
        // No TTY in CI means no backend; nothing to check then
        let Ok(tui) = Tui::new() else {
            return;
        };
        let mut tui = tui.with_tick_rate(Duration::from_millis(250));
        assert_eq!(tui.tick_rate, Duration::from_millis(250));
        assert!(!tui.is_active());
        assert!(tui.exit().is_ok());
    }
}
