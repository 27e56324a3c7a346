//! Positional move intents behind drag-style reordering.
//!
//! The controller is agnostic of geometry: it receives a source todo, a
//! target (a todo plus an insertion side, or a bare section), and splices.
//! Cycle prevention is the caller's job — reject a drop with
//! [`tree::is_descendant`] before calling in here; the model does not
//! re-validate.

use crate::model::board::Board;
use crate::ops::tree;

/// The todo being dragged and the section it was picked up from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub section_id: String,
    pub todo_id: String,
}

/// Move the source todo before or after a target todo, possibly across
/// sections and nesting levels. Drops that would leave the order unchanged
/// (same sequence, already on the correct side of the target) are skipped.
/// Returns whether the board changed.
pub fn move_todo(
    board: &mut Board,
    source: &DragSource,
    target_todo_id: &str,
    target_section_id: &str,
    insert_before: bool,
) -> bool {
    let Some(source_pos) = board
        .section(&source.section_id)
        .and_then(|s| tree::position_of(&s.todos, &source.todo_id))
    else {
        return false;
    };
    let Some(target_pos) = board
        .section(target_section_id)
        .and_then(|s| tree::position_of(&s.todos, target_todo_id))
    else {
        return false;
    };

    // Same-sequence drops that are already in position are a no-op. This
    // is only detected within one sequence; a cross-section drop always
    // splices.
    if source.section_id == target_section_id && source_pos.parent_id == target_pos.parent_id {
        let (src, tgt) = (source_pos.index, target_pos.index);
        if src == tgt
            || (insert_before && src + 1 == tgt)
            || (!insert_before && tgt + 1 == src)
        {
            return false;
        }
    }

    let Some(source_section) = board.section_mut(&source.section_id) else {
        return false;
    };
    let Some(mut todo) = tree::remove_by_id(&mut source_section.todos, &source.todo_id) else {
        return false;
    };

    // The target section was resolved above and the board has not changed
    // shape since, so this lookup cannot fail.
    let Some(target_section) = board.section_mut(target_section_id) else {
        return false;
    };

    // Re-finding the target after the splice folds in the index shift a
    // same-sequence removal causes. The target can only have vanished if
    // it sat inside the detached subtree, which the caller's descendant
    // guard rules out; land at the section root if it happens anyway.
    match tree::find_info(&mut target_section.todos, target_todo_id) {
        Some(info) => {
            let at = if insert_before { info.index } else { info.index + 1 };
            todo.parent_id = info.parent_id.clone();
            info.seq.insert(at, todo);
        }
        None => {
            tree::insert_root(&mut target_section.todos, todo);
        }
    }
    true
}

/// Detach the source todo from wherever it sits and append it to the target
/// section's root sequence. Used when a drop lands on a section header or
/// on empty space below a section's list. Returns whether the board changed.
pub fn move_to_root(board: &mut Board, source: &DragSource, target_section_id: &str) -> bool {
    if board.section(target_section_id).is_none() {
        return false;
    }
    let Some(source_section) = board.section_mut(&source.section_id) else {
        return false;
    };
    let Some(todo) = tree::remove_by_id(&mut source_section.todos, &source.todo_id) else {
        return false;
    };
    let Some(target_section) = board.section_mut(target_section_id) else {
        return false;
    };
    tree::insert_root(&mut target_section.todos, todo);
    true
}
