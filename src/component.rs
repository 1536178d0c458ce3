//! Component trait - Interface for UI components
//!
//! Widgets own their presentation state and render themselves. Input is
//! translated into Actions; events from the rest of the application arrive
//! through the bus, which each widget subscribes to when attached.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` / `handle_mouse_event` map input to Actions
/// 2. `update` applies an Action and may return a follow-up
/// 3. `draw` renders into the given area
pub trait Component {
    /// Map a key event to an Action without changing state
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Map a mouse event to an Action
    ///
    /// `area` is where the component was last drawn, for hit testing.
    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) -> Result<Option<Action>> {
        let _ = (mouse, area);
        Ok(None)
    }

    /// Apply an Action, optionally returning a follow-up Action
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render the component. No state changes other than scroll clamping.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
