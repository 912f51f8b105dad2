//! The `Component` trait shared by every screen, panel and dialog

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// A piece of the console UI.
///
/// Input is translated into an [`Action`] first (`handle_*_event`), and only
/// `update` changes state. `App` routes each action to the component that
/// owns the affected state, so a grid never touches a dialog directly.
pub trait Component {
    /// Runs once before the first frame.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an action; no state changes here.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an action. A returned action is dispatched next, in the same
    /// loop iteration.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render into `area`. May record hit areas and scroll offsets for
    /// later mouse handling, but never changes records.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
