//! Layout calculations for the console panel

use crate::components::console::{SPLITTER_HANDLE_OFFSET, SPLITTER_LOWER_BOUND};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Smallest editor, borders included
const MIN_EDITOR_ROWS: u16 = 3;
/// Rows always left for the results region
const MIN_RESULT_ROWS: u16 = 3;

/// Console panel areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleLayout {
    /// Region the splitter divides (editor + handle + toolbar + results)
    pub split: Rect,
    pub editor: Rect,
    pub splitter: Rect,
    pub toolbar: Rect,
    pub results: Rect,
    pub help: Rect,
}

/// Toolbar hit areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarLayout {
    pub grid: Rect,
    pub chart: Rect,
    pub refresh: Rect,
    pub export_label: Rect,
    pub export: Rect,
    pub copy: Rect,
}

/// Editor row range a splitter allows inside a container of `container_rows`
///
/// The editor keeps at least `lower_bound_px` and the region below the
/// handle keeps at least `handle_offset_px`. `None` when both cannot fit.
pub fn split_bounds(
    lower_bound_px: u32,
    handle_offset_px: u32,
    cell_height_px: u32,
    container_rows: u16,
) -> Option<(u32, u32)> {
    let cell = cell_height_px.max(1);
    let min = lower_bound_px.div_ceil(cell);
    let total = u32::from(container_rows) * cell;
    let max = total.saturating_sub(handle_offset_px) / cell;
    (min <= max).then_some((min, max))
}

/// Editor rows for a pixel basis, bounded by what the split region can hold
///
/// Uses the same range as the console splitter so the drawn handle is always
/// a position the splitter can move from.
pub fn editor_rows(basis_px: u32, cell_height_px: u16, split_height: u16) -> u16 {
    let cell = u32::from(cell_height_px.max(1));
    let wanted = basis_px / cell;
    let wanted = match split_bounds(SPLITTER_LOWER_BOUND, SPLITTER_HANDLE_OFFSET, cell, split_height) {
        Some((min, max)) => wanted.clamp(min, max),
        None => wanted,
    };
    let wanted = u16::try_from(wanted).unwrap_or(u16::MAX);
    // handle + toolbar take two rows
    let max = split_height.saturating_sub(2 + MIN_RESULT_ROWS);
    wanted.max(MIN_EDITOR_ROWS).min(max)
}

/// Calculate the console layout for an editor basis in pixels
pub fn calculate_console_layout(area: Rect, basis_px: u32, cell_height_px: u16) -> ConsoleLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let split = main_chunks[0];

    let rows = editor_rows(basis_px, cell_height_px, split.height);
    let split_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(split);

    ConsoleLayout {
        split,
        editor: split_chunks[0],
        splitter: split_chunks[1],
        toolbar: split_chunks[2],
        results: split_chunks[3],
        help: main_chunks[1],
    }
}

/// Split the toolbar row into its buttons and the export field
pub fn calculate_toolbar_layout(toolbar: Rect) -> ToolbarLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(11),
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(toolbar);

    ToolbarLayout {
        grid: chunks[1],
        chart: chunks[3],
        refresh: chunks[5],
        export_label: chunks[7],
        export: chunks[8],
        copy: chunks[10],
    }
}

/// Whether a cell lies inside a rect
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_rows_follow_basis() {
        // 350px / 16px = 21 rows
        assert_eq!(editor_rows(350, 16, 60), 21);
        assert_eq!(editor_rows(390, 16, 60), 24);
    }

    #[test]
    fn test_editor_rows_bounded() {
        // 200px / 16px rounds up to 13 rows
        assert_eq!(editor_rows(1, 16, 60), 13);
        // (30 * 16 - 200) / 16 = 17 rows
        assert_eq!(editor_rows(10_000, 16, 30), 17);
    }

    #[test]
    fn test_editor_rows_fall_back_when_split_cannot_fit() {
        // 1px cells: 200 rows minimum never fits in 60
        assert_eq!(editor_rows(350, 0, 60), 60 - 5);
        assert_eq!(editor_rows(1, 1, 60), MIN_EDITOR_ROWS);
    }

    #[test]
    fn test_editor_rows_stay_inside_split_bounds() {
        // Default preference on a short terminal: 29 rows allow at most 16
        let (min, max) = split_bounds(SPLITTER_LOWER_BOUND, SPLITTER_HANDLE_OFFSET, 16, 29).unwrap();
        assert_eq!((min, max), (13, 16));
        assert_eq!(u32::from(editor_rows(350, 16, 29)), max);

        for height in 20..80 {
            let rows = u32::from(editor_rows(350, 16, height));
            if let Some((min, max)) = split_bounds(SPLITTER_LOWER_BOUND, SPLITTER_HANDLE_OFFSET, 16, height) {
                assert!(rows >= min && rows <= max, "height {height}: {rows} rows");
            }
        }
    }

    #[test]
    fn test_split_bounds() {
        assert_eq!(split_bounds(200, 200, 10, 50), Some((20, 30)));
        assert_eq!(split_bounds(200, 200, 10, 30), None);
    }

    #[test]
    fn test_console_layout_stacks_regions() {
        let layout = calculate_console_layout(Rect::new(0, 0, 100, 40), 240, 16);
        assert_eq!(layout.editor, Rect::new(0, 0, 100, 15));
        assert_eq!(layout.splitter, Rect::new(0, 15, 100, 1));
        assert_eq!(layout.toolbar, Rect::new(0, 16, 100, 1));
        assert_eq!(layout.results, Rect::new(0, 17, 100, 22));
        assert_eq!(layout.help, Rect::new(0, 39, 100, 1));
        assert_eq!(layout.split.height, 39);
    }

    #[test]
    fn test_toolbar_layout_positions() {
        let toolbar = calculate_toolbar_layout(Rect::new(0, 5, 80, 1));
        assert_eq!(toolbar.grid, Rect::new(1, 5, 6, 1));
        assert_eq!(toolbar.chart, Rect::new(8, 5, 7, 1));
        assert_eq!(toolbar.refresh, Rect::new(16, 5, 11, 1));
        assert_eq!(toolbar.copy, Rect::new(73, 5, 6, 1));
        assert_eq!(toolbar.export.x, 37);
        assert_eq!(toolbar.export.width, 35);
    }

    #[test]
    fn test_hit() {
        let rect = Rect::new(2, 3, 4, 1);
        assert!(hit(rect, 2, 3));
        assert!(hit(rect, 5, 3));
        assert!(!hit(rect, 6, 3));
        assert!(!hit(rect, 2, 4));
    }
}
