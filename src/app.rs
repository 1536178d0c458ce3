//! Root application component
//!
//! The App owns the shared bus and plays the host: it switches between the
//! top-level panels, maps keys and mouse input to Actions, forwards window
//! resizes and lifecycle hooks onto the bus, and draws whatever the console
//! controller says is shown.

use crate::action::Action;
use crate::bus::{
    Bus, Payload, MSG_ACTIVE_PANEL, MSG_PREFERENCES_LOAD, MSG_PREFERENCES_SAVE,
    MSG_QUERY_EXECUTE, MSG_WINDOW_RESIZE,
};
use crate::component::Component;
use crate::components::layout::calculate_toolbar_layout;
use crate::components::toolbar::{draw_splitter, draw_toolbar};
use crate::components::{
    calculate_console_layout, hit, ConsoleLayout, ConsoleServices, EditorComponent, HelpPanel,
    PanelController, HELP_PANEL_NAME, PANEL_NAME,
};
use crate::services::CsvSource;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const INITIAL_QUERY: &str = "select * from trades";

/// Top-level panels the host navigates between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Console,
    Help,
}

impl Panel {
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Console => PANEL_NAME,
            Panel::Help => HELP_PANEL_NAME,
        }
    }
}

/// Main application state
pub struct App {
    pub bus: Bus,
    pub console: PanelController,
    pub editor: EditorComponent,
    pub help: HelpPanel,
    pub active_panel: Panel,
    pub should_quit: bool,
    /// Name of the data source shown in the status bar
    source_name: String,
    cell_height_px: u16,
    tick: u64,
    /// Terminal area as of the last draw
    area: Rect,
    /// Console layout as of the last draw, for mouse hit testing
    layout: Option<ConsoleLayout>,
}

impl App {
    /// Wire up the console and run the startup lifecycle
    pub fn new(services: ConsoleServices, source: CsvSource) -> App {
        let bus = Bus::new();
        let cell_height_px = services.cell_height_px;
        let console = PanelController::attach(&bus, services);
        let source_name = source.describe();
        source.attach(&bus);

        let mut app = App {
            bus,
            console,
            editor: EditorComponent::with_text(INITIAL_QUERY),
            help: HelpPanel::default(),
            active_panel: Panel::Console,
            should_quit: false,
            source_name,
            cell_height_px,
            tick: 0,
            area: Rect::default(),
            layout: None,
        };

        app.bus.publish(MSG_PREFERENCES_LOAD, Payload::Empty);
        app.switch_panel(Panel::Console);
        app.bus.publish(MSG_WINDOW_RESIZE, Payload::Empty);
        tracing::info!(source = %app.source_name, "console ready");
        app
    }

    /// Persist preferences before exit
    pub fn shutdown(&self) {
        self.bus.publish(MSG_PREFERENCES_SAVE, Payload::Empty);
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn switch_panel(&mut self, panel: Panel) {
        self.active_panel = panel;
        self.bus
            .publish(MSG_ACTIVE_PANEL, Payload::Panel(panel.name().to_string()));
    }

    fn handle_console_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::F(5) => Some(Action::ExecuteQuery),
            KeyCode::Char('e') if ctrl => Some(Action::ExecuteQuery),
            KeyCode::Char('r') if ctrl => Some(Action::RefreshQuery),
            KeyCode::Char('g') if ctrl => Some(Action::ShowGrid),
            KeyCode::Char('t') if ctrl => Some(Action::ShowChart),
            KeyCode::Char('l') if ctrl => Some(Action::SelectExportUrl),
            KeyCode::Char('y') if ctrl => Some(Action::CopyExportUrl),
            KeyCode::Up if ctrl => Some(Action::ShrinkEditor),
            KeyCode::Down if ctrl => Some(Action::GrowEditor),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            _ => return self.editor.handle_key_event(key),
        };
        Ok(action)
    }

    fn nudge_splitter(&self, rows: i32) {
        if let Some(layout) = self.layout {
            self.console
                .splitter()
                .nudge(&self.bus, rows, layout.splitter.y, layout.split);
        }
    }

    fn draw_console(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let targets = self.console.targets();
        let layout = calculate_console_layout(area, targets.editor_basis, self.cell_height_px);

        self.editor.draw(frame, layout.editor)?;
        draw_splitter(frame, layout.splitter, self.console.splitter().is_dragging());
        draw_toolbar(
            frame,
            &calculate_toolbar_layout(layout.toolbar),
            &targets,
            self.tick,
        );

        if targets.grid_shown {
            self.console.grid().borrow_mut().draw(frame, layout.results)?;
        } else if targets.chart_shown {
            self.console.chart().borrow_mut().draw(frame, layout.results)?;
        }

        let status = Line::from(vec![
            Span::styled(" F1 ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" help  "),
            Span::styled(
                format!("source: {}", self.source_name),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(
                    "  rows: {}  split: {}px",
                    self.console.grid().borrow().row_count(),
                    self.console.split_height()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), layout.help);

        self.layout = Some(layout);
        Ok(())
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => Some(Action::Quit),
            KeyCode::F(1) => Some(Action::ShowHelp),
            KeyCode::F(2) => Some(Action::ShowConsole),
            _ => None,
        };
        if action.is_some() {
            return Ok(action);
        }

        match self.active_panel {
            Panel::Help => self.help.handle_key_event(key),
            Panel::Console => self.handle_console_key(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, _area: Rect) -> Result<Option<Action>> {
        if self.active_panel != Panel::Console {
            return Ok(None);
        }
        let Some(layout) = self.layout else {
            return Ok(None);
        };
        let (column, row) = (mouse.column, mouse.row);
        let dragging = self.console.splitter().is_dragging();

        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let toolbar = calculate_toolbar_layout(layout.toolbar);
                if hit(layout.splitter, column, row) {
                    Some(Action::SplitterDragStart(row))
                } else if hit(toolbar.grid, column, row) {
                    Some(Action::ShowGrid)
                } else if hit(toolbar.chart, column, row) {
                    Some(Action::ShowChart)
                } else if hit(toolbar.refresh, column, row) {
                    Some(Action::RefreshQuery)
                } else if hit(toolbar.export, column, row) {
                    Some(Action::SelectExportUrl)
                } else if hit(toolbar.copy, column, row) {
                    Some(Action::CopyExportUrl)
                } else {
                    None
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if dragging => Some(Action::SplitterDrag(row)),
            MouseEventKind::Up(MouseButton::Left) if dragging => Some(Action::SplitterDragEnd),
            MouseEventKind::ScrollDown if hit(layout.results, column, row) => {
                Some(Action::ScrollDown)
            }
            MouseEventKind::ScrollUp if hit(layout.results, column, row) => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.tick = self.tick.wrapping_add(1),
            Action::Resize(width, height) => {
                self.bus.publish(
                    MSG_WINDOW_RESIZE,
                    Payload::Area(Rect::new(0, 0, width, height)),
                );
            }
            Action::Quit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::ShowConsole => self.switch_panel(Panel::Console),
            Action::ShowHelp => self.switch_panel(Panel::Help),

            // ─────────────────────────────────────────────────────────────────
            // Console toolbar
            // ─────────────────────────────────────────────────────────────────
            Action::ExecuteQuery => {
                let query = self.editor.text();
                tracing::info!(chars = query.len(), "executing query");
                self.bus.publish(MSG_QUERY_EXECUTE, Payload::Query(query));
            }
            Action::RefreshQuery => self.console.refresh(&self.bus),
            Action::ShowGrid => self.console.show_grid(),
            Action::ShowChart => self.console.show_chart(),
            Action::SelectExportUrl => self.console.select_export_url(),
            Action::CopyExportUrl => self.console.copy_export_url(),

            // ─────────────────────────────────────────────────────────────────
            // Splitter
            // ─────────────────────────────────────────────────────────────────
            Action::GrowEditor => self.nudge_splitter(1),
            Action::ShrinkEditor => self.nudge_splitter(-1),
            Action::SplitterDragStart(row) => {
                if let Some(layout) = self.layout {
                    self.console.splitter_mut().begin(row, layout.split);
                }
            }
            Action::SplitterDrag(row) => self.console.splitter_mut().drag(&self.bus, row),
            Action::SplitterDragEnd => self.console.splitter_mut().end(),

            // ─────────────────────────────────────────────────────────────────
            // Scrolling
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                match self.active_panel {
                    Panel::Help => {
                        self.help.update(action)?;
                    }
                    Panel::Console => {
                        self.console.grid().borrow_mut().update(action)?;
                    }
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Editor
            // ─────────────────────────────────────────────────────────────────
            Action::EditorInput(_)
            | Action::EditorPaste(_)
            | Action::EditorNewline
            | Action::EditorBackspace
            | Action::EditorDelete
            | Action::CursorLeft
            | Action::CursorRight
            | Action::CursorUp
            | Action::CursorDown
            | Action::CursorHome
            | Action::CursorEnd => {
                if self.active_panel == Panel::Console {
                    self.editor.update(action)?;
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.area = area;
        if self.console.targets().panel_shown {
            self.draw_console(frame, area)
        } else {
            self.layout = None;
            self.help.draw(frame, area)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ViewMode, DEFAULT_SPLIT_HEIGHT, SPLITTER_POSITION_KEY};
    use crate::services::storage::MemoryStore;
    use crate::services::{Clipboard, ExportLink, PreferenceStore};
    use ratatui::{backend::TestBackend, Terminal};
    use std::rc::Rc;

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn copy(&self, _text: &str) {}
    }

    fn app_with_store(store: Rc<MemoryStore>) -> App {
        App::new(
            ConsoleServices {
                store: Some(store as Rc<dyn PreferenceStore>),
                clipboard: Rc::new(NoClipboard),
                export_link: ExportLink::new("http://localhost:9000").unwrap(),
                cell_height_px: 16,
            },
            CsvSource::Sample,
        )
    }

    fn draw(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| app.draw(frame, frame.area()).unwrap())
            .unwrap();
        terminal
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn press(app: &mut App, key: KeyEvent) {
        if let Some(action) = app.handle_key_event(key).unwrap() {
            app.update(action).unwrap();
        }
    }

    #[test]
    fn test_startup_loads_preferences_and_shows_console() {
        let store = Rc::new(MemoryStore::new());
        store.set(SPLITTER_POSITION_KEY, "480").unwrap();
        let app = app_with_store(store);

        assert_eq!(app.console.split_height(), 480);
        assert_eq!(app.console.targets().editor_basis, 480);
        assert!(app.console.is_visible());
    }

    #[test]
    fn test_execute_runs_pipeline_and_updates_export_link() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        press(&mut app, key(KeyCode::F(5), KeyModifiers::NONE));

        let targets = app.console.targets();
        assert_eq!(
            targets.export_url,
            "http://localhost:9000/exp?query=select+*+from+trades"
        );
        assert!(app.console.grid().borrow().row_count() > 0);
    }

    #[test]
    fn test_toggle_keys_switch_view_mode() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        press(&mut app, key(KeyCode::F(5), KeyModifiers::NONE));
        press(&mut app, key(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(app.console.view_mode(), ViewMode::Chart);

        press(&mut app, key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.console.view_mode(), ViewMode::Grid);
        assert!(!app.console.targets().refresh_spinning);
    }

    #[test]
    fn test_help_panel_hides_console() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        press(&mut app, key(KeyCode::F(1), KeyModifiers::NONE));
        assert!(!app.console.is_visible());
        assert_eq!(app.active_panel, Panel::Help);

        // Typing on the help panel does not reach the editor
        press(&mut app, key(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(app.editor.text(), INITIAL_QUERY);

        press(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.console.is_visible());
    }

    #[test]
    fn test_keyboard_resize_persists() {
        let store = Rc::new(MemoryStore::new());
        let mut app = app_with_store(Rc::clone(&store));
        draw(&mut app, 80, 50);

        press(&mut app, key(KeyCode::Down, KeyModifiers::CONTROL));
        assert_eq!(app.console.split_height(), DEFAULT_SPLIT_HEIGHT + 16);
        assert_eq!(
            store.get(SPLITTER_POSITION_KEY).unwrap(),
            Some((DEFAULT_SPLIT_HEIGHT + 16).to_string())
        );
    }

    #[test]
    fn test_grow_on_short_terminal_never_shrinks_editor() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        // 29 split rows leave room for at most 16 editor rows
        draw(&mut app, 80, 30);
        let before = app.layout.unwrap().editor.height;
        assert_eq!(before, 16);

        press(&mut app, key(KeyCode::Down, KeyModifiers::CONTROL));
        draw(&mut app, 80, 30);
        assert_eq!(app.console.split_height(), DEFAULT_SPLIT_HEIGHT);
        assert_eq!(app.layout.unwrap().editor.height, before);

        press(&mut app, key(KeyCode::Up, KeyModifiers::CONTROL));
        assert_eq!(app.console.split_height(), DEFAULT_SPLIT_HEIGHT - 16);
    }

    #[test]
    fn test_mouse_drag_on_splitter() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        draw(&mut app, 80, 50);
        let handle_row = app.layout.unwrap().splitter.y;

        let mouse = |kind, row| MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        };
        for event in [
            mouse(MouseEventKind::Down(MouseButton::Left), handle_row),
            mouse(MouseEventKind::Drag(MouseButton::Left), handle_row + 2),
            mouse(MouseEventKind::Up(MouseButton::Left), handle_row + 2),
        ] {
            if let Some(action) = app.handle_mouse_event(event, app.area()).unwrap() {
                app.update(action).unwrap();
            }
        }

        assert_eq!(app.console.split_height(), DEFAULT_SPLIT_HEIGHT + 32);
        assert!(!app.console.splitter().is_dragging());
    }

    #[test]
    fn test_mouse_click_on_chart_button() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        draw(&mut app, 80, 50);
        let toolbar = calculate_toolbar_layout(app.layout.unwrap().toolbar);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: toolbar.chart.x,
            row: toolbar.chart.y,
            modifiers: KeyModifiers::NONE,
        };
        let action = app.handle_mouse_event(click, app.area()).unwrap();
        assert_eq!(action, Some(Action::ShowChart));
    }

    #[test]
    fn test_draw_console_and_help() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        press(&mut app, key(KeyCode::F(5), KeyModifiers::NONE));
        draw(&mut app, 100, 40);
        assert!(app.layout.is_some());

        press(&mut app, key(KeyCode::F(1), KeyModifiers::NONE));
        draw(&mut app, 100, 40);
        assert!(app.layout.is_none());
    }

    #[test]
    fn test_status_bar_shows_rows_and_split() {
        let mut app = app_with_store(Rc::new(MemoryStore::new()));
        press(&mut app, key(KeyCode::F(5), KeyModifiers::NONE));
        let rows = app.console.grid().borrow().row_count();
        let terminal = draw(&mut app, 100, 40);

        let buffer = terminal.backend().buffer();
        let status: String = (0..100).map(|x| buffer[(x, 39)].symbol()).collect();
        assert!(status.contains("source: sample.csv"), "{status}");
        assert!(status.contains(&format!("rows: {rows}  split: 350px")), "{status}");
    }
}
