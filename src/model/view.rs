//! Console view state - view mode and the UI targets the controller drives
//!
//! `ConsoleTargets` is the explicit set of UI handles the controller writes
//! and the host renders. Nothing else mutates it.

/// Which result widget is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Chart,
}

/// UI targets owned by the console panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleTargets {
    /// Editor region height in pixels
    pub editor_basis: u32,
    /// Console container shown
    pub panel_shown: bool,
    /// Export link display field
    pub export_url: String,
    /// Export field text is selected
    pub export_selected: bool,
    /// Refresh icon spinning
    pub refresh_spinning: bool,
    pub grid_button_active: bool,
    pub chart_button_active: bool,
    pub grid_shown: bool,
    pub chart_shown: bool,
}

impl Default for ConsoleTargets {
    fn default() -> Self {
        Self {
            editor_basis: super::DEFAULT_SPLIT_HEIGHT,
            panel_shown: false,
            export_url: String::new(),
            export_selected: false,
            refresh_spinning: false,
            grid_button_active: true,
            chart_button_active: false,
            grid_shown: true,
            chart_shown: false,
        }
    }
}

impl ConsoleTargets {
    /// Show exactly one result widget and mark exactly one toggle active
    pub fn apply_view_mode(&mut self, mode: ViewMode) {
        let grid = mode == ViewMode::Grid;
        self.grid_button_active = grid;
        self.chart_button_active = !grid;
        self.grid_shown = grid;
        self.chart_shown = !grid;
    }
}
