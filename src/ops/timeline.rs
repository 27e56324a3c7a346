//! Flattens the board into a date-anchored projection for the timeline view.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::board::Board;
use crate::model::todo::Todo;

/// One row of the timeline: a todo positioned on the date axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualTodo {
    pub id: String,
    pub text: String,
    /// The positioning date: the todo's own due date, or `today` when it
    /// had none
    pub due_date: NaiveDate,
    pub completed: bool,
    pub section_title: String,
    pub section_id: String,
    pub is_child: bool,
    /// True when `due_date` is a stand-in for a missing due date
    pub had_no_due_date: bool,
}

/// Project every todo on the board, section by section, depth-first within
/// each section. No filtering and no re-sorting: output order is section
/// order, then pre-order document order.
pub fn project(board: &Board, today: NaiveDate) -> Vec<VisualTodo> {
    let mut out = Vec::new();
    for section in &board.sections {
        collect(&section.todos, &section.title, &section.id, today, false, &mut out);
    }
    out
}

fn collect(
    todos: &[Todo],
    section_title: &str,
    section_id: &str,
    today: NaiveDate,
    is_child: bool,
    out: &mut Vec<VisualTodo>,
) {
    for todo in todos {
        out.push(VisualTodo {
            id: todo.id.clone(),
            text: todo.text.clone(),
            due_date: todo.due_date.unwrap_or(today),
            completed: todo.completed,
            section_title: section_title.to_string(),
            section_id: section_id.to_string(),
            is_child,
            had_no_due_date: todo.due_date.is_none(),
        });
        collect(&todo.children, section_title, section_id, today, true, out);
    }
}

/// The visual axis: earliest due date through latest due date plus the
/// horizon, inclusive, one-day granularity. None for an empty projection.
pub fn date_range(todos: &[VisualTodo], horizon_days: u64) -> Option<(NaiveDate, NaiveDate)> {
    let min = todos.iter().map(|t| t.due_date).min()?;
    let max = todos.iter().map(|t| t.due_date).max()?;
    let end = max.checked_add_days(Days::new(horizon_days)).unwrap_or(max);
    Some((min, end))
}

/// Calendar-date comparison; time of day never enters into it.
pub fn is_overdue(todo: &VisualTodo, today: NaiveDate) -> bool {
    todo.due_date < today && !todo.completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::Section;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_board() -> Board {
        let mut child = Todo::with_text("a1".into(), "Child".into());
        child.due_date = Some(date(2024, 1, 10));
        let mut a = Todo::with_text("a".into(), "Dated".into());
        a.due_date = Some(date(2024, 1, 1));
        a.children = vec![child];
        let b = Todo::with_text("b".into(), "Undated".into());

        let mut s1 = Section::new("s1".into(), "Work");
        s1.todos = vec![a, b];
        let mut s2 = Section::new("s2".into(), "Home");
        s2.todos = vec![Todo::with_text("c".into(), "Errand".into())];
        Board {
            sections: vec![s1, s2],
        }
    }

    #[test]
    fn test_project_emits_every_todo_in_document_order() {
        let rows = project(&sample_board(), date(2024, 1, 5));
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "a1", "b", "c"]);
    }

    #[test]
    fn test_project_marks_children_and_sections() {
        let rows = project(&sample_board(), date(2024, 1, 5));
        assert!(!rows[0].is_child);
        assert!(rows[1].is_child);
        assert_eq!(rows[1].section_title, "Work");
        assert_eq!(rows[3].section_id, "s2");
    }

    #[test]
    fn test_undated_todos_take_today() {
        let today = date(2024, 1, 5);
        let rows = project(&sample_board(), today);
        let undated = rows.iter().find(|r| r.id == "b").unwrap();
        assert_eq!(undated.due_date, today);
        assert!(undated.had_no_due_date);
        assert!(!is_overdue(undated, today));

        let dated = rows.iter().find(|r| r.id == "a").unwrap();
        assert!(!dated.had_no_due_date);
        assert!(is_overdue(dated, today));
    }

    #[test]
    fn test_completed_is_never_overdue() {
        let mut board = sample_board();
        crate::ops::tree::find_by_id_mut(&mut board.sections[0].todos, "a")
            .unwrap()
            .completed = true;
        let today = date(2024, 1, 5);
        let rows = project(&board, today);
        let a = rows.iter().find(|r| r.id == "a").unwrap();
        assert!(!is_overdue(a, today));
    }

    #[test]
    fn test_date_range_spans_min_to_max_plus_horizon() {
        let rows = project(&sample_board(), date(2024, 1, 5));
        let (start, end) = date_range(&rows, 7).unwrap();
        assert_eq!(start, date(2024, 1, 1));
        assert_eq!(end, date(2024, 1, 17));
    }

    #[test]
    fn test_date_range_empty_projection() {
        assert_eq!(date_range(&[], 7), None);
    }

    #[test]
    fn test_project_empty_board() {
        let board = Board::default();
        assert!(project(&board, date(2024, 1, 5)).is_empty());
    }
}
