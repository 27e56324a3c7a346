use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store;
use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::model::todo::Todo;
use crate::ops::reorder::DragSource;
use crate::ops::timeline::{self, VisualTodo};

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    Timeline,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Move,
    Confirm,
}

/// What the edit buffer is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    TodoText { section_id: String, todo_id: String },
    SectionTitle { section_id: String },
    DueDate { section_id: String, todo_id: String },
}

/// Inline edit session state
#[derive(Debug, Clone)]
pub struct EditState {
    pub target: EditTarget,
    pub buffer: String,
    /// Byte offset into `buffer`
    pub cursor: usize,
}

/// A pending deletion waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTodo { section_id: String, todo_id: String },
    DeleteSection { section_id: String },
}

/// The todo grabbed in move mode
#[derive(Debug, Clone)]
pub struct MoveState {
    pub source: DragSource,
}

/// A row in the board view's flat visible list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatRow {
    SectionHeader {
        section_id: String,
    },
    Todo {
        section_id: String,
        todo_id: String,
        depth: usize,
        has_children: bool,
        is_collapsed: bool,
    },
}

impl FlatRow {
    pub fn todo_id(&self) -> Option<&str> {
        match self {
            FlatRow::Todo { todo_id, .. } => Some(todo_id),
            FlatRow::SectionHeader { .. } => None,
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            FlatRow::Todo { section_id, .. } => section_id,
            FlatRow::SectionHeader { section_id } => section_id,
        }
    }
}

/// A row in the timeline view
#[derive(Debug, Clone)]
pub enum TimelineRow {
    SectionLabel { title: String },
    Bar { todo: VisualTodo },
}

/// Main application state
pub struct App {
    pub board: Board,
    pub config: BoardConfig,
    pub data_dir: PathBuf,
    pub theme: Theme,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    /// Calendar date used for timeline positioning and overdue marks;
    /// refreshed on every event-loop tick
    pub today: NaiveDate,
    /// Board view cursor: index into the flat row list
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Ids of todos whose children are hidden
    pub collapsed: HashSet<String>,
    pub edit: Option<EditState>,
    pub move_state: Option<MoveState>,
    pub confirm: Option<ConfirmAction>,
    /// One-shot status message, cleared on the next key press
    pub notice: Option<String>,
    /// Timeline cursor: index into the timeline row list (bar rows only)
    pub timeline_cursor: usize,
    /// Leftmost visible day, None until first render centers today
    pub timeline_scroll: Option<usize>,
    pub show_key_hints: bool,
}

impl App {
    pub fn new(board: Board, config: BoardConfig, data_dir: PathBuf) -> Self {
        let theme = Theme::from_config(&config.ui);
        let show_key_hints = config.ui.show_key_hints;
        App {
            board,
            config,
            data_dir,
            theme,
            view: View::Board,
            mode: Mode::Navigate,
            should_quit: false,
            today: Local::now().date_naive(),
            cursor: 0,
            scroll_offset: 0,
            collapsed: HashSet::new(),
            edit: None,
            move_state: None,
            confirm: None,
            notice: None,
            timeline_cursor: 0,
            timeline_scroll: None,
            show_key_hints,
        }
    }

    /// Persist the board; a failed save becomes a status notice (the blob
    /// is journaled by the store).
    pub fn save_board(&mut self) {
        if let Err(e) = store::save(&self.data_dir, &self.board) {
            self.notice = Some(format!("save failed: {}", e));
        }
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    // -----------------------------------------------------------------
    // Board view rows
    // -----------------------------------------------------------------

    /// Flatten the board into visible rows, honoring collapsed subtrees.
    pub fn build_flat_rows(&self) -> Vec<FlatRow> {
        let mut rows = Vec::new();
        for section in &self.board.sections {
            rows.push(FlatRow::SectionHeader {
                section_id: section.id.clone(),
            });
            self.flatten_todos(&section.todos, &section.id, 0, &mut rows);
        }
        rows
    }

    fn flatten_todos(
        &self,
        todos: &[Todo],
        section_id: &str,
        depth: usize,
        rows: &mut Vec<FlatRow>,
    ) {
        for todo in todos {
            let has_children = !todo.children.is_empty();
            let is_collapsed = has_children && self.collapsed.contains(&todo.id);
            rows.push(FlatRow::Todo {
                section_id: section_id.to_string(),
                todo_id: todo.id.clone(),
                depth,
                has_children,
                is_collapsed,
            });
            if has_children && !is_collapsed {
                self.flatten_todos(&todo.children, section_id, depth + 1, rows);
            }
        }
    }

    /// The row under the board cursor
    pub fn cursor_row(&self) -> Option<FlatRow> {
        let rows = self.build_flat_rows();
        rows.get(self.cursor).cloned()
    }

    /// Place the board cursor on the row for the given todo id
    pub fn move_cursor_to_todo(&mut self, todo_id: &str) {
        let rows = self.build_flat_rows();
        if let Some(idx) = rows.iter().position(|r| r.todo_id() == Some(todo_id)) {
            self.cursor = idx;
        }
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.build_flat_rows().len();
        if len == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(len - 1);
        }
    }

    // -----------------------------------------------------------------
    // Timeline rows
    // -----------------------------------------------------------------

    /// Project the board and interleave section label rows, preserving
    /// projector order.
    pub fn build_timeline_rows(&self) -> Vec<TimelineRow> {
        let projected = timeline::project(&self.board, self.today);
        let mut rows = Vec::new();
        let mut last_section: Option<String> = None;
        for todo in projected {
            if last_section.as_deref() != Some(todo.section_id.as_str()) {
                let title = if todo.section_title.is_empty() {
                    "(untitled)".to_string()
                } else {
                    todo.section_title.clone()
                };
                rows.push(TimelineRow::SectionLabel { title });
                last_section = Some(todo.section_id.clone());
            }
            rows.push(TimelineRow::Bar { todo });
        }
        rows
    }

    /// The axis range for the current projection
    pub fn timeline_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let projected = timeline::project(&self.board, self.today);
        timeline::date_range(&projected, self.config.timeline.horizon_days)
    }

    /// The bar under the timeline cursor
    pub fn timeline_cursor_bar(&self) -> Option<VisualTodo> {
        match self.build_timeline_rows().get(self.timeline_cursor) {
            Some(TimelineRow::Bar { todo }) => Some(todo.clone()),
            _ => None,
        }
    }

    /// Move the timeline cursor to the nearest bar row in the given
    /// direction, skipping section labels.
    pub fn step_timeline_cursor(&mut self, down: bool) {
        let rows = self.build_timeline_rows();
        if rows.is_empty() {
            self.timeline_cursor = 0;
            return;
        }
        let mut idx = self.timeline_cursor.min(rows.len() - 1);
        loop {
            let next = if down {
                if idx + 1 >= rows.len() {
                    break;
                }
                idx + 1
            } else {
                if idx == 0 {
                    break;
                }
                idx - 1
            };
            idx = next;
            if matches!(rows[idx], TimelineRow::Bar { .. }) {
                self.timeline_cursor = idx;
                break;
            }
        }
    }

    /// Snap the timeline cursor onto a bar row (labels are not selectable)
    pub fn clamp_timeline_cursor(&mut self) {
        let rows = self.build_timeline_rows();
        if rows.is_empty() {
            self.timeline_cursor = 0;
            return;
        }
        self.timeline_cursor = self.timeline_cursor.min(rows.len() - 1);
        if !matches!(rows[self.timeline_cursor], TimelineRow::Bar { .. }) {
            self.step_timeline_cursor(true);
            if !matches!(
                rows.get(self.timeline_cursor),
                Some(TimelineRow::Bar { .. })
            ) {
                self.step_timeline_cursor(false);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// UI state persistence
// ---------------------------------------------------------------------------

fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.data_dir) else {
        return;
    };
    if state.view == "timeline" {
        app.view = View::Timeline;
    }
    app.cursor = state.cursor;
    app.collapsed = state.collapsed;
    app.clamp_cursor();
}

fn save_ui_state(app: &App) {
    let state = UiState {
        view: match app.view {
            View::Board => "board".to_string(),
            View::Timeline => "timeline".to_string(),
        },
        cursor: app.cursor,
        collapsed: app.collapsed.clone(),
    };
    let _ = write_ui_state(&app.data_dir, &state);
}

// ---------------------------------------------------------------------------
// Entry point and event loop
// ---------------------------------------------------------------------------

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(data_dir)?;
    let config = config_io::load_config(data_dir)?;
    let board = store::load(data_dir, &config.board.default_section_title)?;
    let mut app = App::new(board, config, data_dir.to_path_buf());

    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.today = Local::now().date_naive();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::Section;

    fn test_app() -> App {
        let mut b = Todo::with_text("b".into(), "B".into());
        b.children = vec![Todo::with_text("b1".into(), "B one".into())];
        let mut s1 = Section::new("s1".into(), "Work");
        s1.todos = vec![Todo::with_text("a".into(), "A".into()), b];
        let s2 = Section::new("s2".into(), "Home");
        let board = Board {
            sections: vec![s1, s2],
        };
        App::new(board, BoardConfig::default(), PathBuf::from("/tmp/slate-test"))
    }

    #[test]
    fn test_flat_rows_include_headers_and_todos() {
        let app = test_app();
        let rows = app.build_flat_rows();
        assert_eq!(rows.len(), 5);
        assert!(matches!(&rows[0], FlatRow::SectionHeader { section_id } if section_id == "s1"));
        assert_eq!(rows[1].todo_id(), Some("a"));
        assert_eq!(rows[2].todo_id(), Some("b"));
        assert_eq!(rows[3].todo_id(), Some("b1"));
        assert!(matches!(&rows[4], FlatRow::SectionHeader { section_id } if section_id == "s2"));
    }

    #[test]
    fn test_collapse_hides_subtree() {
        let mut app = test_app();
        app.collapsed.insert("b".into());
        let rows = app.build_flat_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.todo_id() != Some("b1")));
        match &rows[2] {
            FlatRow::Todo { is_collapsed, .. } => assert!(is_collapsed),
            other => panic!("unexpected row: {:?}", other),
        }
    }

    #[test]
    fn test_move_cursor_to_todo() {
        let mut app = test_app();
        app.move_cursor_to_todo("b1");
        assert_eq!(app.cursor, 3);
        app.move_cursor_to_todo("missing");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_timeline_rows_interleave_labels() {
        let mut app = test_app();
        // s2 is empty, so only s1 appears in the projection
        let rows = app.build_timeline_rows();
        assert_eq!(rows.len(), 4);
        assert!(matches!(&rows[0], TimelineRow::SectionLabel { title } if title == "Work"));
        assert!(matches!(&rows[1], TimelineRow::Bar { .. }));

        app.clamp_timeline_cursor();
        assert_eq!(app.timeline_cursor, 1);
        app.step_timeline_cursor(true);
        assert_eq!(app.timeline_cursor, 2);
        app.step_timeline_cursor(false);
        assert_eq!(app.timeline_cursor, 1);
        app.step_timeline_cursor(false);
        assert_eq!(app.timeline_cursor, 1, "labels are skipped, cursor stays");
    }
}
