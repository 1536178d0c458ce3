//! Console panel controller
//!
//! Keeps the split layout, the grid/chart view mode and the export link in
//! step with the bus. The controller owns two pieces of state, the layout
//! preference (persisted) and the view mode, and writes everything the
//! host draws into `ConsoleTargets`. It renders nothing itself.
//!
//! All handlers run synchronously inside `Bus::publish`. Borrows of the
//! shared state are always released before a handler publishes again.

use crate::bus::{
    Bus, Payload, MSG_ACTIVE_PANEL, MSG_GRID_REFRESH, MSG_PREFERENCES_LOAD,
    MSG_PREFERENCES_SAVE, MSG_QUERY_DATASET, MSG_QUERY_ERROR, MSG_WINDOW_RESIZE,
};
use crate::components::chart::ChartComponent;
use crate::components::grid::GridComponent;
use crate::components::splitter::{resize_topic, Splitter};
use crate::model::{ConsoleTargets, LayoutPreference, ViewMode, SPLITTER_POSITION_KEY};
use crate::services::{Clipboard, ExportLink, PreferenceStore};
use std::cell::RefCell;
use std::rc::Rc;

/// Name the host uses for the console in active-panel events
pub const PANEL_NAME: &str = "console";

/// Smallest editor height the splitter allows, in pixels
pub const SPLITTER_LOWER_BOUND: u32 = 200;

/// Height kept below the splitter handle, in pixels
pub const SPLITTER_HANDLE_OFFSET: u32 = 200;

/// Collaborators the controller needs at attach time
pub struct ConsoleServices {
    /// Durable storage; `None` when the environment has none
    pub store: Option<Rc<dyn PreferenceStore>>,
    pub clipboard: Rc<dyn Clipboard>,
    pub export_link: ExportLink,
    pub cell_height_px: u16,
}

#[derive(Debug, Default)]
struct ConsoleState {
    layout: LayoutPreference,
    view_mode: ViewMode,
    visible: bool,
    targets: ConsoleTargets,
}

impl ConsoleState {
    fn apply_layout(&mut self) {
        self.targets.editor_basis = self.layout.height();
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.targets.apply_view_mode(mode);
    }
}

/// The console panel controller
pub struct PanelController {
    state: Rc<RefCell<ConsoleState>>,
    clipboard: Rc<dyn Clipboard>,
    grid: Rc<RefCell<GridComponent>>,
    chart: Rc<RefCell<ChartComponent>>,
    splitter: Splitter,
}

impl PanelController {
    /// Subscribe the console to the bus. Call once at startup.
    pub fn attach(bus: &Bus, services: ConsoleServices) -> PanelController {
        let ConsoleServices {
            store,
            clipboard,
            export_link,
            cell_height_px,
        } = services;
        let state = Rc::new(RefCell::new(ConsoleState::default()));

        let s = Rc::clone(&state);
        bus.subscribe(MSG_WINDOW_RESIZE, move |_, _| s.borrow_mut().apply_layout());

        // Registered before the widgets so the link is current when they run
        let s = Rc::clone(&state);
        bus.subscribe(MSG_QUERY_DATASET, move |_, payload| {
            let Payload::Dataset(dataset) = payload else {
                return;
            };
            let mut state = s.borrow_mut();
            state.targets.export_url = export_link.encode(&dataset.query);
            state.targets.export_selected = false;
            state.targets.refresh_spinning = false;
            state.set_view_mode(ViewMode::Grid);
        });

        let s = Rc::clone(&state);
        bus.subscribe(MSG_QUERY_ERROR, move |_, _| {
            s.borrow_mut().targets.refresh_spinning = false;
        });

        let s = Rc::clone(&state);
        bus.subscribe(&resize_topic(PANEL_NAME), move |bus, payload| {
            let Payload::Delta(delta) = payload else {
                return;
            };
            s.borrow_mut().layout.adjust(*delta);
            bus.publish(MSG_WINDOW_RESIZE, Payload::Empty);
            bus.publish(MSG_PREFERENCES_SAVE, Payload::Empty);
        });

        let s = Rc::clone(&state);
        let save_store = store.clone();
        bus.subscribe(MSG_PREFERENCES_SAVE, move |_, _| {
            let Some(store) = &save_store else {
                return;
            };
            let value = s.borrow().layout.to_stored();
            match store.set(SPLITTER_POSITION_KEY, &value) {
                Ok(()) => tracing::debug!(height = %value, "saved splitter position"),
                Err(err) => tracing::warn!(%err, "could not save splitter position"),
            }
        });

        let s = Rc::clone(&state);
        bus.subscribe(MSG_PREFERENCES_LOAD, move |_, _| {
            let stored = store.as_ref().and_then(|store| {
                store.get(SPLITTER_POSITION_KEY).unwrap_or_else(|err| {
                    tracing::warn!(%err, "could not read splitter position");
                    None
                })
            });
            let layout = LayoutPreference::from_stored(stored.as_deref());
            tracing::debug!(height = layout.height(), "loaded splitter position");
            s.borrow_mut().layout = layout;
        });

        let s = Rc::clone(&state);
        bus.subscribe(MSG_ACTIVE_PANEL, move |_, payload| {
            let Payload::Panel(name) = payload else {
                return;
            };
            let visible = name == PANEL_NAME;
            let mut state = s.borrow_mut();
            state.visible = visible;
            state.targets.panel_shown = visible;
        });

        let grid = GridComponent::attach(bus);
        let chart = ChartComponent::attach(bus);
        let splitter = Splitter::new(
            PANEL_NAME,
            SPLITTER_LOWER_BOUND,
            SPLITTER_HANDLE_OFFSET,
            cell_height_px,
        );

        PanelController {
            state,
            clipboard,
            grid,
            chart,
            splitter,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Click on the export field: select its whole text
    pub fn select_export_url(&self) {
        self.state.borrow_mut().targets.export_selected = true;
    }

    /// Click on the copy button
    pub fn copy_export_url(&self) {
        let url = self.state.borrow().targets.export_url.clone();
        if !url.is_empty() {
            self.clipboard.copy(&url);
        }
    }

    /// Click on the refresh button: spin the icon and ask the grid to re-run
    pub fn refresh(&self, bus: &Bus) {
        self.state.borrow_mut().targets.refresh_spinning = true;
        bus.publish(MSG_GRID_REFRESH, Payload::Empty);
    }

    pub fn show_grid(&self) {
        self.state.borrow_mut().set_view_mode(ViewMode::Grid);
    }

    pub fn show_chart(&self) {
        self.state.borrow_mut().set_view_mode(ViewMode::Chart);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Current layout preference in pixels
    pub fn split_height(&self) -> u32 {
        self.state.borrow().layout.height()
    }

    #[cfg(test)]
    pub fn view_mode(&self) -> ViewMode {
        self.state.borrow().view_mode
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Snapshot of the UI targets for drawing
    pub fn targets(&self) -> ConsoleTargets {
        self.state.borrow().targets.clone()
    }

    pub fn grid(&self) -> Rc<RefCell<GridComponent>> {
        Rc::clone(&self.grid)
    }

    pub fn chart(&self) -> Rc<RefCell<ChartComponent>> {
        Rc::clone(&self.chart)
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    pub fn splitter_mut(&mut self) -> &mut Splitter {
        &mut self.splitter
    }
}
