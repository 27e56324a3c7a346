use chrono::NaiveDate;
use serde::Serialize;

use crate::model::section::Section;
use crate::model::todo::Todo;
use crate::ops::timeline::{self, VisualTodo};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TodoJson>,
}

impl TodoJson {
    pub fn from_todo(todo: &Todo) -> Self {
        TodoJson {
            id: todo.id.clone(),
            text: todo.text.clone(),
            completed: todo.completed,
            due_date: todo.due_date,
            children: todo.children.iter().map(TodoJson::from_todo).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct SectionJson {
    pub id: String,
    pub title: String,
    pub todos: Vec<TodoJson>,
}

impl SectionJson {
    pub fn from_section(section: &Section) -> Self {
        SectionJson {
            id: section.id.clone(),
            title: section.title.clone(),
            todos: section.todos.iter().map(TodoJson::from_todo).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct SectionInfoJson {
    pub id: String,
    pub title: String,
    pub todo_count: usize,
}

#[derive(Serialize)]
pub struct TimelineJson {
    pub today: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    pub rows: Vec<VisualTodo>,
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

/// Short form of an id for display. ULIDs front-load a timestamp, so ids
/// minted the same day share a long prefix; the tail is the part that
/// tells them apart.
pub fn short_id(id: &str) -> &str {
    &id[id.len().saturating_sub(6)..]
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn section_heading(section: &Section) -> String {
    let title = if section.title.is_empty() {
        "(untitled)"
    } else {
        &section.title
    };
    format!("{}  [{}]", title, short_id(&section.id))
}

/// Render one section's todo tree for `slate ls`.
pub fn render_section_tree(section: &Section) -> String {
    let mut out = String::new();
    out.push_str(&section_heading(section));
    out.push('\n');
    if section.todos.is_empty() {
        out.push_str("  (no todos)\n");
        return out;
    }
    render_todos(&section.todos, 1, &mut out);
    out
}

fn render_todos(todos: &[Todo], depth: usize, out: &mut String) {
    for todo in todos {
        out.push_str(&"  ".repeat(depth));
        out.push_str(checkbox(todo.completed));
        out.push(' ');
        out.push_str(short_id(&todo.id));
        out.push_str("  ");
        out.push_str(&todo.text);
        if let Some(date) = todo.due_date {
            out.push_str(&format!("  · {}", date));
        }
        out.push('\n');
        render_todos(&todo.children, depth + 1, out);
    }
}

/// Render the projection for `slate timeline`: one row per todo in
/// projector order, grouped under section headings.
///
/// Markers: `!` overdue, `~` positioned at today for lack of a due date.
pub fn render_timeline_text(
    rows: &[VisualTodo],
    range: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    match range {
        Some((start, end)) => {
            out.push_str(&format!(
                "timeline {} → {}  (today {})\n",
                start, end, today
            ));
        }
        None => {
            out.push_str("No tasks.\n");
            return out;
        }
    }

    let mut last_section: Option<&str> = None;
    for row in rows {
        if last_section != Some(row.section_id.as_str()) {
            let title = if row.section_title.is_empty() {
                "(untitled)"
            } else {
                &row.section_title
            };
            out.push_str(&format!("\n{}\n", title));
            last_section = Some(row.section_id.as_str());
        }
        let overdue = if timeline::is_overdue(row, today) { "!" } else { " " };
        let defaulted = if row.had_no_due_date { "~" } else { " " };
        let child = if row.is_child { "· " } else { "" };
        out.push_str(&format!(
            "  {} {}  {} {}{} {}{}\n",
            row.due_date.format("%m-%d"),
            row.due_date.format("%a"),
            checkbox(row.completed),
            overdue,
            defaulted,
            child,
            row.text,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::Board;
    use crate::ops::timeline::project;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_board() -> Board {
        let mut child = Todo::with_text("child1".into(), "Child".into());
        child.due_date = Some(date(2024, 1, 10));
        child.parent_id = Some("dated1".into());
        let mut a = Todo::with_text("dated1".into(), "Dated".into());
        a.due_date = Some(date(2024, 1, 1));
        a.children = vec![child];
        let b = Todo::with_text("undat1".into(), "Undated".into());

        let mut s1 = Section::new("sect01".into(), "Work");
        s1.todos = vec![a, b];
        let mut s2 = Section::new("sect02".into(), "Home");
        s2.todos = vec![Todo::with_text("errnd1".into(), "Errand".into())];
        Board {
            sections: vec![s1, s2],
        }
    }

    #[test]
    fn test_short_id_takes_the_tail() {
        assert_eq!(short_id("01hq3kabcdef"), "abcdef");
        assert_eq!(short_id("ab"), "ab");
    }

    #[test]
    fn test_render_section_tree() {
        let board = sample_board();
        let text = render_section_tree(&board.sections[0]);
        insta::assert_snapshot!(text.trim_end(), @r"
        Work  [sect01]
          [ ] dated1  Dated  · 2024-01-01
            [ ] child1  Child  · 2024-01-10
          [ ] undat1  Undated
        ");
    }

    #[test]
    fn test_render_empty_section() {
        let section = Section::new("sect09".into(), "");
        let text = render_section_tree(&section);
        assert!(text.starts_with("(untitled)"));
        assert!(text.contains("(no todos)"));
    }

    #[test]
    fn test_render_timeline_text() {
        let board = sample_board();
        let today = date(2024, 1, 5);
        let rows = project(&board, today);
        let range = timeline::date_range(&rows, 7);
        let text = render_timeline_text(&rows, range, today);
        insta::assert_snapshot!(text.trim_end(), @r"
        timeline 2024-01-01 → 2024-01-17  (today 2024-01-05)

        Work
          01-01 Mon  [ ] !  Dated
          01-10 Wed  [ ]    · Child
          01-05 Fri  [ ]  ~ Undated

        Home
          01-05 Fri  [ ]  ~ Errand
        ");
    }

    #[test]
    fn test_render_timeline_empty() {
        let text = render_timeline_text(&[], None, date(2024, 1, 5));
        assert_eq!(text, "No tasks.\n");
    }
}
