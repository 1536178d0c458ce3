//! UI Components
//!
//! The console controller and the widgets it initializes, plus the host's
//! editor and help panel. Widgets that react to bus events subscribe
//! themselves when attached.

pub mod chart;
pub mod console;
pub mod editor;
pub mod grid;
pub mod help;
pub mod layout;
pub mod splitter;
pub mod sql_highlight;
pub mod toolbar;

pub use console::{ConsoleServices, PanelController, PANEL_NAME};
pub use editor::EditorComponent;
pub use help::{HelpPanel, HELP_PANEL_NAME};
pub use layout::{calculate_console_layout, hit, ConsoleLayout};
