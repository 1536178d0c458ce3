//! Console toolbar and splitter handle rendering
//!
//! Pure rendering of the controller's UI targets: view toggles, refresh
//! button, export link field and copy button.

use crate::components::layout::ToolbarLayout;
use crate::model::ConsoleTargets;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn button_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Refresh icon for the current tick
pub fn refresh_icon(spinning: bool, tick: u64) -> &'static str {
    if spinning {
        SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
    } else {
        "⟳"
    }
}

pub fn draw_toolbar(frame: &mut Frame, layout: &ToolbarLayout, targets: &ConsoleTargets, tick: u64) {
    frame.render_widget(
        Paragraph::new("[Grid]").style(button_style(targets.grid_button_active)),
        layout.grid,
    );
    frame.render_widget(
        Paragraph::new("[Chart]").style(button_style(targets.chart_button_active)),
        layout.chart,
    );

    let refresh_style = if targets.refresh_spinning {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(format!(
            "[{} Refresh]",
            refresh_icon(targets.refresh_spinning, tick)
        ))
        .style(refresh_style),
        layout.refresh,
    );

    frame.render_widget(
        Paragraph::new(Span::styled("Export:", Style::default().fg(Color::DarkGray))),
        layout.export_label,
    );

    let export_style = if targets.export_selected {
        Style::default().fg(Color::White).bg(Color::Blue)
    } else {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    };
    let export_text = if targets.export_url.is_empty() {
        Span::styled(" run a query to get a link", export_style.fg(Color::Gray))
    } else {
        Span::styled(targets.export_url.clone(), export_style)
    };
    frame.render_widget(
        Paragraph::new(Line::from(export_text)).style(export_style),
        layout.export,
    );

    frame.render_widget(
        Paragraph::new("[Copy]").style(Style::default().fg(Color::Gray)),
        layout.copy,
    );
}

pub fn draw_splitter(frame: &mut Frame, area: Rect, dragging: bool) {
    let style = if dragging {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label = " ═ ";
    let label_width = label.chars().count();
    let width = area.width as usize;
    let side = width.saturating_sub(label_width) / 2;
    let line = format!(
        "{}{}{}",
        "─".repeat(side),
        label,
        "─".repeat(width.saturating_sub(side + label_width))
    );
    frame.render_widget(Paragraph::new(line).style(style), area);
}
