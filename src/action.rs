//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to key and mouse events, and the App
//! turns them into controller calls or bus events.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations/updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Switch to the console panel
    ShowConsole,
    /// Switch to the help panel
    ShowHelp,

    // ─────────────────────────────────────────────────────────────────────────
    // Console Toolbar
    // ─────────────────────────────────────────────────────────────────────────
    /// Execute the query in the editor
    ExecuteQuery,
    /// Re-run the last query
    RefreshQuery,
    /// Show results as a grid
    ShowGrid,
    /// Show results as a chart
    ShowChart,
    /// Select the export link text
    SelectExportUrl,
    /// Copy the export link to the clipboard
    CopyExportUrl,

    // ─────────────────────────────────────────────────────────────────────────
    // Splitter
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the splitter down one row
    GrowEditor,
    /// Move the splitter up one row
    ShrinkEditor,
    /// Pointer pressed on the splitter at a row
    SplitterDragStart(u16),
    /// Pointer dragged to a row
    SplitterDrag(u16),
    /// Pointer released
    SplitterDragEnd,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll results up one line
    ScrollUp,
    /// Scroll results down one line
    ScrollDown,
    /// Scroll results up one page
    PageUp,
    /// Scroll results down one page
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Insert a character at the cursor
    EditorInput(char),
    /// Insert pasted text at the cursor
    EditorPaste(String),
    /// Insert a line break at the cursor
    EditorNewline,
    /// Delete the character before the cursor
    EditorBackspace,
    /// Delete the character under the cursor
    EditorDelete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Quit => write!(f, "Quit"),
            Action::ShowConsole => write!(f, "ShowConsole"),
            Action::ShowHelp => write!(f, "ShowHelp"),
            Action::ExecuteQuery => write!(f, "ExecuteQuery"),
            Action::RefreshQuery => write!(f, "RefreshQuery"),
            Action::ShowGrid => write!(f, "ShowGrid"),
            Action::ShowChart => write!(f, "ShowChart"),
            Action::SelectExportUrl => write!(f, "SelectExportUrl"),
            Action::CopyExportUrl => write!(f, "CopyExportUrl"),
            Action::GrowEditor => write!(f, "GrowEditor"),
            Action::ShrinkEditor => write!(f, "ShrinkEditor"),
            Action::SplitterDragStart(row) => write!(f, "SplitterDragStart({})", row),
            Action::SplitterDrag(row) => write!(f, "SplitterDrag({})", row),
            Action::SplitterDragEnd => write!(f, "SplitterDragEnd"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::EditorInput(c) => write!(f, "EditorInput('{}')", c),
            Action::EditorPaste(text) => write!(f, "EditorPaste({} chars)", text.chars().count()),
            Action::EditorNewline => write!(f, "EditorNewline"),
            Action::EditorBackspace => write!(f, "EditorBackspace"),
            Action::EditorDelete => write!(f, "EditorDelete"),
            Action::CursorLeft => write!(f, "CursorLeft"),
            Action::CursorRight => write!(f, "CursorRight"),
            Action::CursorUp => write!(f, "CursorUp"),
            Action::CursorDown => write!(f, "CursorDown"),
            Action::CursorHome => write!(f, "CursorHome"),
            Action::CursorEnd => write!(f, "CursorEnd"),
        }
    }
}
