//! Splitter drag handle
//!
//! Translates pointer drags (and keyboard nudges) on the divider between
//! the editor and results into `splitter.<namespace>.resize` events carrying
//! a pixel delta. Positions are measured in rows from the top of the split
//! container and converted to pixels with the configured cell height.

use crate::bus::{Bus, Payload};
use crate::components::layout::split_bounds;
use ratatui::layout::Rect;

/// Topic a splitter in `namespace` publishes resize deltas on
pub fn resize_topic(namespace: &str) -> String {
    format!("splitter.{}.resize", namespace)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    container: Rect,
    /// Editor rows as of the last published delta
    last_offset: u32,
}

/// Divider between two stacked regions
#[derive(Debug)]
pub struct Splitter {
    topic: String,
    /// Minimum editor height in pixels
    lower_bound: u32,
    /// Minimum height kept below the handle in pixels
    handle_offset: u32,
    cell_height: u32,
    drag: Option<DragState>,
}

impl Splitter {
    pub fn new(namespace: &str, lower_bound: u32, handle_offset: u32, cell_height: u16) -> Self {
        Self {
            topic: resize_topic(namespace),
            lower_bound,
            handle_offset,
            cell_height: u32::from(cell_height.max(1)),
            drag: None,
        }
    }

    #[cfg(test)]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Allowed editor row range inside a container, if any
    fn bounds(&self, container: Rect) -> Option<(u32, u32)> {
        split_bounds(
            self.lower_bound,
            self.handle_offset,
            self.cell_height,
            container.height,
        )
    }

    fn offset_of(row: u16, container: Rect) -> u32 {
        u32::from(row.saturating_sub(container.y))
    }

    /// Pixel delta moving the handle from `from` rows to `to` rows, clamped
    ///
    /// A handle outside the bounds never moves against the requested
    /// direction.
    fn delta(&self, from: u32, to: u32, container: Rect) -> Option<(u32, i32)> {
        let (min, max) = self.bounds(container)?;
        let target = to.clamp(min, max);
        if target == from || (to > from) != (target > from) {
            return None;
        }
        let delta = (i64::from(target) - i64::from(from)) * i64::from(self.cell_height);
        Some((target, i32::try_from(delta).ok()?))
    }

    /// Pointer pressed on the handle
    pub fn begin(&mut self, row: u16, container: Rect) {
        self.drag = Some(DragState {
            container,
            last_offset: Self::offset_of(row, container),
        });
    }

    /// Pointer moved while pressed
    pub fn drag(&mut self, bus: &Bus, row: u16) {
        let Some(state) = self.drag else {
            return;
        };
        let to = Self::offset_of(row, state.container);
        if let Some((target, delta)) = self.delta(state.last_offset, to, state.container) {
            self.drag = Some(DragState {
                last_offset: target,
                ..state
            });
            bus.publish(&self.topic, Payload::Delta(delta));
        }
    }

    /// Pointer released
    pub fn end(&mut self) {
        self.drag = None;
    }

    /// Move the handle currently at `handle_row` by `rows`
    pub fn nudge(&self, bus: &Bus, rows: i32, handle_row: u16, container: Rect) {
        let from = Self::offset_of(handle_row, container);
        let to = from.saturating_add_signed(rows);
        if let Some((_, delta)) = self.delta(from, to, container) {
            bus.publish(&self.topic, Payload::Delta(delta));
        }
    }
}
