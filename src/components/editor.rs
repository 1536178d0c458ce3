//! Query editor - multi-line SQL input with highlighting

use crate::action::Action;
use crate::component::Component;
use crate::components::sql_highlight::highlight_sql;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Multi-line query editor
#[derive(Debug)]
pub struct EditorComponent {
    lines: Vec<String>,
    /// Cursor line
    row: usize,
    /// Cursor position in chars within the line
    col: usize,
    /// First visible line
    scroll: usize,
}

impl Default for EditorComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    /// Replace the contents, placing the cursor at the end
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = self.current_len();
        self.scroll = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[cfg(test)]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn current_len(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    /// Byte index of a char position in the current line
    fn byte_index(&self, col: usize) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.col);
        self.lines[self.row].insert(idx, c);
        self.col += 1;
    }

    /// Insert text that may span lines (pasted text)
    pub fn insert_str(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            for c in part.chars().filter(|c| *c != '\r') {
                self.insert_char(c);
            }
        }
    }

    pub fn newline(&mut self) {
        let idx = self.byte_index(self.col);
        let rest = self.lines[self.row].split_off(idx);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let idx = self.byte_index(self.col - 1);
            self.lines[self.row].remove(idx);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.current_len() {
            let idx = self.byte_index(self.col);
            self.lines[self.row].remove(idx);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_vertical(&mut self, down: bool) {
        if down && self.row + 1 < self.lines.len() {
            self.row += 1;
        } else if !down && self.row > 0 {
            self.row -= 1;
        }
        self.col = self.col.min(self.current_len());
    }

    fn move_horizontal(&mut self, right: bool) {
        if right {
            if self.col < self.current_len() {
                self.col += 1;
            } else if self.row + 1 < self.lines.len() {
                self.row += 1;
                self.col = 0;
            }
        } else if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    /// Keep the cursor line inside a viewport of `height` lines
    fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }
}

impl Component for EditorComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char(c) => Some(Action::EditorInput(c)),
            KeyCode::Tab => Some(Action::EditorPaste("    ".to_string())),
            KeyCode::Enter => Some(Action::EditorNewline),
            KeyCode::Backspace => Some(Action::EditorBackspace),
            KeyCode::Delete => Some(Action::EditorDelete),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Home => Some(Action::CursorHome),
            KeyCode::End => Some(Action::CursorEnd),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::EditorInput(c) => self.insert_char(c),
            Action::EditorPaste(text) => self.insert_str(&text),
            Action::EditorNewline => self.newline(),
            Action::EditorBackspace => self.backspace(),
            Action::EditorDelete => self.delete(),
            Action::CursorLeft => self.move_horizontal(false),
            Action::CursorRight => self.move_horizontal(true),
            Action::CursorUp => self.move_vertical(false),
            Action::CursorDown => self.move_vertical(true),
            Action::CursorHome => self.col = 0,
            Action::CursorEnd => self.col = self.current_len(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let inner_height = area.height.saturating_sub(2) as usize;
        self.clamp_scroll(inner_height);

        let paragraph = Paragraph::new(highlight_sql(&self.text()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Query · F5 to run ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);

        if inner_height > 0 {
            let line = &self.lines[self.row];
            let prefix = &line[..self.byte_index(self.col)];
            let x = area.x + 1 + prefix.width() as u16;
            let y = area.y + 1 + (self.row - self.scroll) as u16;
            if x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(editor: &mut EditorComponent, actions: &[Action]) {
        for action in actions {
            editor.update(action.clone()).unwrap();
        }
    }

    #[test]
    fn test_typing_and_newline() {
        let mut editor = EditorComponent::new();
        for c in "select 1".chars() {
            editor.update(Action::EditorInput(c)).unwrap();
        }
        apply(&mut editor, &[Action::CursorLeft, Action::EditorNewline]);
        assert_eq!(editor.text(), "select \n1");
        assert_eq!(editor.cursor(), (1, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = EditorComponent::with_text("select\n1");
        apply(&mut editor, &[Action::CursorHome, Action::EditorBackspace]);
        assert_eq!(editor.text(), "select1");
        assert_eq!(editor.cursor(), (0, 6));
    }

    #[test]
    fn test_delete_at_line_end_joins_next() {
        let mut editor = EditorComponent::with_text("a\nb");
        apply(&mut editor, &[Action::CursorUp, Action::CursorEnd, Action::EditorDelete]);
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut editor = EditorComponent::with_text("naïve");
        apply(
            &mut editor,
            &[Action::CursorLeft, Action::CursorLeft, Action::EditorBackspace],
        );
        assert_eq!(editor.text(), "nave");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_paste_multiline() {
        let mut editor = EditorComponent::new();
        editor.update(Action::EditorPaste("select *\r\nfrom t".into())).unwrap();
        assert_eq!(editor.text(), "select *\nfrom t");
    }

    #[test]
    fn test_cursor_wraps_between_lines() {
        let mut editor = EditorComponent::with_text("ab\ncd");
        apply(&mut editor, &[Action::CursorHome, Action::CursorLeft]);
        assert_eq!(editor.cursor(), (0, 2));
        apply(&mut editor, &[Action::CursorRight]);
        assert_eq!(editor.cursor(), (1, 0));
    }

    #[test]
    fn test_control_keys_are_not_text() {
        let mut editor = EditorComponent::new();
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key_event(key).unwrap(), None);
        let key = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(editor.handle_key_event(key).unwrap(), Some(Action::EditorInput('S')));
    }
}
