//! Model layer - console state types
//!
//! - `Dataset` - query results delivered on the bus
//! - `LayoutPreference` - the persisted split height
//! - `ViewMode` / `ConsoleTargets` - view state the controller drives

pub mod dataset;
pub mod preference;
pub mod view;

pub use dataset::Dataset;
pub use preference::{LayoutPreference, DEFAULT_SPLIT_HEIGHT, SPLITTER_POSITION_KEY};
pub use view::{ConsoleTargets, ViewMode};
