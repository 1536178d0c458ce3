//! Services the console depends on
//!
//! - Preference storage (file or memory)
//! - Export link encoding
//! - Terminal clipboard
//! - CSV dataset source standing in for the query pipeline

pub mod clipboard;
pub mod csv_source;
pub mod export;
pub mod storage;

pub use clipboard::{Clipboard, Osc52Clipboard};
pub use csv_source::CsvSource;
pub use export::ExportLink;
pub use storage::{FileStore, PreferenceStore};
