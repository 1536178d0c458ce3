//! Help panel
//!
//! A top-level panel listing every key binding. Showing it hides the console.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Panel name announced on the bus when help is shown
pub const HELP_PANEL_NAME: &str = "help";

#[derive(Default)]
pub struct HelpPanel {
    pub scroll_offset: usize,
}

impl Component for HelpPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::ShowConsole),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            Action::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(10),
            Action::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = build_help_content();
        let total = content.len();
        let visible_height = area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help · F2 or Esc returns to the console ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);

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

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:14}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Query");
    add_shortcut(&mut lines, "F5 / Ctrl+e", "Run the query in the editor");
    add_shortcut(&mut lines, "Ctrl+r", "Re-run the last query");

    add_section(&mut lines, "Results");
    add_shortcut(&mut lines, "Ctrl+g", "Show results as a grid");
    add_shortcut(&mut lines, "Ctrl+t", "Show results as a chart");
    add_shortcut(&mut lines, "PgUp / PgDn", "Scroll the grid");
    add_shortcut(&mut lines, "Mouse wheel", "Scroll the grid");

    add_section(&mut lines, "Export Link");
    add_shortcut(&mut lines, "Ctrl+l", "Select the export link");
    add_shortcut(&mut lines, "Ctrl+y", "Copy the export link");

    add_section(&mut lines, "Layout");
    add_shortcut(&mut lines, "Ctrl+↑ / Ctrl+↓", "Move the splitter");
    add_shortcut(&mut lines, "Drag divider", "Resize editor and results");

    add_section(&mut lines, "Application");
    add_shortcut(&mut lines, "F1", "Show this help");
    add_shortcut(&mut lines, "F2 / Esc", "Back to the console");
    add_shortcut(&mut lines, "Ctrl+q", "Quit");

    lines
}
