//! Event bus - synchronous in-process publish/subscribe
//!
//! Every part of the console (controller, widgets, host) talks through a
//! single shared `Bus`. Delivery is multicast and synchronous: `publish`
//! returns only after every handler registered for the topic has run, in
//! registration order. Handlers receive the bus itself so they can publish
//! follow-up events from inside a handler.

use crate::model::Dataset;
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Topics
// ─────────────────────────────────────────────────────────────────────────────

/// A query produced results
pub const MSG_QUERY_DATASET: &str = "query.dataset";
/// A query failed to produce results
pub const MSG_QUERY_ERROR: &str = "query.error";
/// Request to execute a query
pub const MSG_QUERY_EXECUTE: &str = "query.execute";
/// The visible top-level panel changed
pub const MSG_ACTIVE_PANEL: &str = "panel.active";
/// Re-run the last query shown in the grid
pub const MSG_GRID_REFRESH: &str = "grid.refresh";
/// Host lifecycle hook: persist preferences
pub const MSG_PREFERENCES_SAVE: &str = "preferences.save";
/// Host lifecycle hook: load preferences
pub const MSG_PREFERENCES_LOAD: &str = "preferences.load";
/// Terminal window was resized (or a re-layout was requested)
pub const MSG_WINDOW_RESIZE: &str = "window.resize";

/// Event payloads carried on the bus
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Dataset(Dataset),
    Query(String),
    Panel(String),
    /// Pixel delta from a splitter drag
    Delta(i32),
    Area(Rect),
    Error(String),
}

type Handler = Rc<dyn Fn(&Bus, &Payload)>;

/// Shared synchronous multicast bus
#[derive(Default)]
pub struct Bus {
    handlers: RefCell<HashMap<String, Vec<Handler>>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a topic
    pub fn subscribe<F>(&self, topic: &str, handler: F)
    where
        F: Fn(&Bus, &Payload) + 'static,
    {
        self.handlers
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Deliver a payload to every handler registered for `topic`
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// publish re-entrantly. Handlers added during this call are not invoked
    /// for it.
    pub fn publish(&self, topic: &str, payload: Payload) {
        let handlers: Vec<Handler> = match self.handlers.borrow().get(topic) {
            Some(list) => list.clone(),
            None => {
                tracing::trace!(topic, "published with no subscribers");
                return;
            }
        };

        tracing::trace!(topic, subscribers = handlers.len(), "publish");
        for handler in handlers {
            handler(self, &payload);
        }
    }

    /// Number of handlers registered for a topic
    #[cfg(test)]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.handlers.borrow().get(topic).map_or(0, Vec::len)
    }
}
