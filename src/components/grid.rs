//! Result grid - tabular display of the latest dataset
//!
//! The grid subscribes to the bus on its own: it takes every dataset-ready
//! event, shows query errors, and answers `grid.refresh` by asking the query
//! pipeline to run its last query again.

use crate::action::Action;
use crate::bus::{
    Bus, Payload, MSG_GRID_REFRESH, MSG_QUERY_DATASET, MSG_QUERY_ERROR, MSG_QUERY_EXECUTE,
};
use crate::component::Component;
use crate::model::Dataset;
use anyhow::Result;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column is allowed to grow, in cells
const MAX_COLUMN_WIDTH: usize = 50;

/// Grid widget for query results
#[derive(Debug, Default)]
pub struct GridComponent {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Query that produced the current rows
    query: Option<String>,
    executed_at: Option<String>,
    error: Option<String>,
    scroll: usize,
}

impl GridComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid and subscribe it to the bus
    pub fn attach(bus: &Bus) -> Rc<RefCell<GridComponent>> {
        let grid = Rc::new(RefCell::new(GridComponent::new()));

        let g = Rc::clone(&grid);
        bus.subscribe(MSG_QUERY_DATASET, move |_, payload| {
            if let Payload::Dataset(dataset) = payload {
                g.borrow_mut().set_dataset(dataset);
            }
        });

        let g = Rc::clone(&grid);
        bus.subscribe(MSG_QUERY_ERROR, move |_, payload| {
            if let Payload::Error(message) = payload {
                g.borrow_mut().error = Some(message.clone());
            }
        });

        let g = Rc::clone(&grid);
        bus.subscribe(MSG_GRID_REFRESH, move |bus, _| {
            let query = g.borrow().query.clone();
            match query {
                Some(query) => {
                    tracing::debug!("refreshing last query");
                    bus.publish(MSG_QUERY_EXECUTE, Payload::Query(query));
                }
                None => bus.publish(
                    MSG_QUERY_ERROR,
                    Payload::Error("Nothing to refresh: no query has run yet".to_string()),
                ),
            }
        });

        grid
    }

    /// Replace the grid contents with a dataset
    pub fn set_dataset(&mut self, dataset: &Dataset) {
        self.headers = dataset.headers.clone();
        self.rows = dataset.rows.clone();
        self.query = Some(dataset.query.clone());
        self.executed_at = Some(dataset.formatted_time());
        self.error = None;
        self.scroll = 0;
    }

    #[cfg(test)]
    pub fn last_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Build table lines from headers and rows
    pub fn build_table_lines(headers: &[String], rows: &[Vec<String>]) -> Vec<Line<'static>> {
        if headers.is_empty() {
            return vec![Line::from("Query returned no columns")];
        }

        let mut col_widths: Vec<usize> = headers.iter().map(|h| h.width().max(1)).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = col_widths.get_mut(i) {
                    *width = (*width).max(cell.width());
                }
            }
        }
        for width in &mut col_widths {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }

        let mut lines = Vec::with_capacity(rows.len() + 2);

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        lines.push(Self::build_row(headers, &col_widths, header_style));

        let separator = col_widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )));

        let cell_style = Style::default().fg(Color::White);
        for row in rows {
            lines.push(Self::build_row(row, &col_widths, cell_style));
        }

        lines
    }

    fn build_row(cells: &[String], widths: &[usize], style: Style) -> Line<'static> {
        let separator = Style::default().fg(Color::DarkGray);
        let spans: Vec<Span> = widths
            .iter()
            .enumerate()
            .flat_map(|(i, &width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                [
                    Span::styled(fit_to_width(cell, width), style),
                    Span::styled(" │ ", separator),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn title(&self) -> String {
        match &self.executed_at {
            Some(time) => format!(" Grid · {} rows · {} ", self.rows.len(), time),
            None => " Grid ".to_string(),
        }
    }
}

/// Pad or truncate text to exactly `width` display cells
fn fit_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

impl Component for GridComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.rows.len().saturating_sub(1);
        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + 10).min(max_scroll);
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(Style::default().fg(Color::DarkGray));

        if let Some(error) = &self.error {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )))
            .block(block.border_style(Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
            return Ok(());
        }

        if self.query.is_none() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Run a query (F5) to see results",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return Ok(());
        }

        let mut content = Self::build_table_lines(&self.headers, &self.rows);
        // Header and separator stay pinned; only data rows scroll
        let body: Vec<Line> = if content.len() > 2 {
            content.split_off(2).into_iter().skip(self.scroll).collect()
        } else {
            Vec::new()
        };
        content.extend(body);

        let visible_height = area.height.saturating_sub(2) as usize;
        let paragraph = Paragraph::new(content).block(block);
        frame.render_widget(paragraph, area);

        let total = self.rows.len() + 2;
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(self.rows.len().saturating_sub(1)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn dataset(query: &str, rows: usize) -> Dataset {
        Dataset::new(query).with_data(
            vec!["id".into(), "name".into()],
            (0..rows)
                .map(|i| vec![i.to_string(), format!("row{}", i)])
                .collect(),
        )
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_fit_to_width_pads_and_truncates() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 4), "abc…");
        // Wide chars count double
        assert_eq!(fit_to_width("日本語", 4), "日… ");
        assert_eq!(fit_to_width("日本語", 4).width(), 4);
    }

    #[test]
    fn test_build_table_lines_aligns_columns() {
        let lines = GridComponent::build_table_lines(
            &["id".into(), "name".into()],
            &[vec!["1".into(), "alice".into()], vec!["22".into(), "bo".into()]],
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(line_text(&lines[0]), "id │ name  │ ");
        assert_eq!(line_text(&lines[2]), "1  │ alice │ ");
        assert_eq!(line_text(&lines[3]), "22 │ bo    │ ");
    }

    #[test]
    fn test_build_table_lines_short_rows_padded() {
        let lines =
            GridComponent::build_table_lines(&["a".into(), "b".into()], &[vec!["x".into()]]);
        assert_eq!(line_text(&lines[2]), "x │   │ ");
    }

    #[test]
    fn test_dataset_event_replaces_contents_and_resets_scroll() {
        let bus = Bus::new();
        let grid = GridComponent::attach(&bus);

        bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset("q1", 30)));
        grid.borrow_mut().update(Action::PageDown).unwrap();
        assert_eq!(grid.borrow().scroll(), 10);

        bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset("q2", 3)));
        let grid = grid.borrow();
        assert_eq!(grid.scroll(), 0);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.last_query(), Some("q2"));
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut grid = GridComponent::new();
        grid.set_dataset(&dataset("q", 3));
        for _ in 0..5 {
            grid.update(Action::ScrollDown).unwrap();
        }
        assert_eq!(grid.scroll(), 2);
        grid.update(Action::PageUp).unwrap();
        assert_eq!(grid.scroll(), 0);
    }

    #[test]
    fn test_refresh_republishes_last_query() {
        let bus = Bus::new();
        let _grid = GridComponent::attach(&bus);
        let executed = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&executed);
        bus.subscribe(MSG_QUERY_EXECUTE, move |_, payload| {
            if let Payload::Query(q) = payload {
                e.borrow_mut().push(q.clone());
            }
        });

        bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset("select 1", 1)));
        bus.publish(MSG_GRID_REFRESH, Payload::Empty);
        assert_eq!(*executed.borrow(), vec!["select 1".to_string()]);
    }

    #[test]
    fn test_refresh_without_query_reports_error() {
        let bus = Bus::new();
        let grid = GridComponent::attach(&bus);
        bus.publish(MSG_GRID_REFRESH, Payload::Empty);
        assert!(grid.borrow().error().is_some());

        bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset("q", 1)));
        assert!(grid.borrow().error().is_none());
    }

    #[test]
    fn test_draw_renders_header() {
        let mut grid = GridComponent::new();
        grid.set_dataset(&dataset("q", 2));

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| grid.draw(frame, frame.area()).unwrap())
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40u16)
            .map(|x| buffer[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("id"));
        assert!(row.contains("name"));
    }
}
