//! Round-trip tests for the board blob: what goes into the store comes
//! back identical, and re-saving without mutation never changes a byte.

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

use slate::io::store;
use slate::model::{Board, Section};
use slate::ops::{reorder, section_ops, todo_ops, tree};

fn build_board() -> Board {
    let mut board = Board::default();
    let work = section_ops::add_section(&mut board, "Work");
    let home = section_ops::add_section(&mut board, "Home");

    let section = board.section_mut(&work).unwrap();
    let report = todo_ops::add_todo_with_text(
        section,
        None,
        "Write report https://example.com/spec".into(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
    )
    .unwrap();
    todo_ops::add_todo_with_text(section, Some(&report), "Collect numbers".into(), None).unwrap();
    todo_ops::add_todo_with_text(section, None, "Plan sprint".into(), None).unwrap();

    let section = board.section_mut(&home).unwrap();
    todo_ops::add_todo_with_text(
        section,
        None,
        "Fix the fence".into(),
        chrono::NaiveDate::from_ymd_opt(2024, 4, 12),
    )
    .unwrap();
    board
}

#[test]
fn save_load_preserves_structure() {
    let tmp = TempDir::new().unwrap();
    let board = build_board();
    store::save(tmp.path(), &board).unwrap();
    let loaded = store::load(tmp.path(), "Personal").unwrap();
    assert_eq!(loaded, board);
}

#[test]
fn save_of_unmutated_load_is_byte_identical_twice() {
    let tmp = TempDir::new().unwrap();
    store::save(tmp.path(), &build_board()).unwrap();

    let loaded = store::load(tmp.path(), "Personal").unwrap();
    store::save(tmp.path(), &loaded).unwrap();
    let first = fs::read(store::board_path(tmp.path())).unwrap();

    let loaded = store::load(tmp.path(), "Personal").unwrap();
    store::save(tmp.path(), &loaded).unwrap();
    let second = fs::read(store::board_path(tmp.path())).unwrap();

    assert_eq!(first, second);
}

#[test]
fn round_trip_survives_structural_edits() {
    let tmp = TempDir::new().unwrap();
    let mut board = build_board();

    // reorder: move the Home todo into Work, after "Plan sprint"
    let home_id = board.sections[1].id.clone();
    let work_id = board.sections[0].id.clone();
    let fence_id = board.sections[1].todos[0].id.clone();
    let plan_id = board.sections[0].todos[1].id.clone();
    let source = reorder::DragSource {
        section_id: home_id,
        todo_id: fence_id.clone(),
    };
    assert!(reorder::move_todo(
        &mut board, &source, &plan_id, &work_id, false
    ));

    store::save(tmp.path(), &board).unwrap();
    let loaded = store::load(tmp.path(), "Personal").unwrap();
    assert_eq!(loaded, board);
    assert!(loaded.sections[1].todos.is_empty());
    assert_eq!(
        tree::find_by_id(&loaded.sections[0].todos, &fence_id)
            .unwrap()
            .text,
        "Fix the fence"
    );
}

#[test]
fn legacy_blob_field_names_still_load() {
    // Blobs written by earlier versions of the board used camelCase keys;
    // they must keep loading unchanged.
    let tmp = TempDir::new().unwrap();
    let blob = r#"{
  "sections": [
    {
      "id": "s1",
      "title": "Personal",
      "todos": [
        {
          "id": "t1",
          "text": "carried over",
          "completed": true,
          "dueDate": "2023-11-05",
          "children": [],
          "parentId": null
        }
      ]
    }
  ]
}
"#;
    fs::write(store::board_path(tmp.path()), blob).unwrap();
    let board = store::load(tmp.path(), "Personal").unwrap();
    let todo = tree::find_by_id(&board.sections[0].todos, "t1").unwrap();
    assert!(todo.completed);
    assert_eq!(
        todo.due_date,
        chrono::NaiveDate::from_ymd_opt(2023, 11, 5)
    );

    // and the re-save emits the same shape
    store::save(tmp.path(), &board).unwrap();
    let rewritten = fs::read_to_string(store::board_path(tmp.path())).unwrap();
    assert_eq!(rewritten, blob);
}

#[test]
fn missing_file_seeds_one_default_section() {
    let tmp = TempDir::new().unwrap();
    let board = store::load(tmp.path(), "Personal").unwrap();
    assert_eq!(board.sections.len(), 1);
    assert_eq!(board.sections[0].title, "Personal");
    assert!(board.sections[0].todos.is_empty());
    // nothing is written until the first save
    assert!(!store::board_path(tmp.path()).exists());
}

#[test]
fn malformed_blob_is_an_error_not_a_reset() {
    let tmp = TempDir::new().unwrap();
    fs::write(store::board_path(tmp.path()), "{ \"sections\": [ oops").unwrap();
    assert!(store::load(tmp.path(), "Personal").is_err());
}

#[test]
fn subtree_is_one_unit_across_the_store() {
    let tmp = TempDir::new().unwrap();
    let mut board = Board::default();
    let id = section_ops::add_section(&mut board, "Deep");
    let section = board.section_mut(&id).unwrap();
    let mut level: Option<String> = None;
    for i in 0..5 {
        level = todo_ops::add_todo_with_text(
            section,
            level.as_deref(),
            format!("level {}", i),
            None,
        );
    }
    store::save(tmp.path(), &board).unwrap();

    let mut loaded = store::load(tmp.path(), "Personal").unwrap();
    let section = loaded.section_mut(&id).unwrap();
    assert_eq!(tree::count_todos(&section.todos), 5);

    // removing the root of the chain detaches all five
    let root_id = section.todos[0].id.clone();
    assert!(tree::remove_by_id(&mut section.todos, &root_id).is_some());
    assert_eq!(tree::count_todos(&section.todos), 0);
}

#[test]
fn empty_board_round_trips() {
    let tmp = TempDir::new().unwrap();
    let board = Board {
        sections: vec![Section::new("s1".into(), "")],
    };
    store::save(tmp.path(), &board).unwrap();
    let loaded = store::load(tmp.path(), "Personal").unwrap();
    assert_eq!(loaded, board);
}
