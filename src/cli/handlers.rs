use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::store;
use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::ops::{check, reorder, section_ops, todo_ops, tree};

type CliResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CliResult {
    let json = cli.json;
    let data_dir = store::data_dir(cli.data_dir.as_deref().map(std::path::Path::new));

    let Some(command) = cli.command else {
        // No subcommand → TUI; main.rs routes there before dispatch
        return Ok(());
    };

    match command {
        // Read commands
        Commands::Sections => cmd_sections(&data_dir, json),
        Commands::Ls(args) => cmd_ls(&data_dir, args, json),
        Commands::Timeline(args) => cmd_timeline(&data_dir, args, json),
        Commands::Check => cmd_check(&data_dir, json),

        // Write commands
        Commands::Section(cmd) => match cmd.command {
            SectionCommands::Add(args) => cmd_section_add(&data_dir, args),
            SectionCommands::Rm(args) => cmd_section_rm(&data_dir, args),
            SectionCommands::Rename(args) => cmd_section_rename(&data_dir, args),
        },
        Commands::Add(args) => cmd_add(&data_dir, args),
        Commands::Done(args) => cmd_set_completed(&data_dir, args, true),
        Commands::Undone(args) => cmd_set_completed(&data_dir, args, false),
        Commands::Due(args) => cmd_due(&data_dir, args),
        Commands::Edit(args) => cmd_edit(&data_dir, args),
        Commands::Rm(args) => cmd_rm(&data_dir, args),
        Commands::Mv(args) => cmd_mv(&data_dir, args),
        Commands::Promote(args) => cmd_promote(&data_dir, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_board(data_dir: &Path) -> Result<(BoardConfig, Board), Box<dyn std::error::Error>> {
    let config = config_io::load_config(data_dir)?;
    let board = store::load(data_dir, &config.board.default_section_title)?;
    Ok((config, board))
}

/// Load-mutate-save under the store lock. The closure returns whether the
/// board changed; unchanged boards are not rewritten.
fn with_board_mut<F>(data_dir: &Path, f: F) -> CliResult
where
    F: FnOnce(&mut Board) -> Result<bool, Box<dyn std::error::Error>>,
{
    std::fs::create_dir_all(data_dir)?;
    let _lock = StoreLock::acquire_default(data_dir)?;
    let (_, mut board) = load_board(data_dir)?;
    if f(&mut board)? {
        store::save(data_dir, &board)?;
    }
    Ok(())
}

/// True when `key` names the id exactly, or is a unique tail (the short
/// form shown in listings) or head of it.
fn id_matches(id: &str, key: &str) -> bool {
    !key.is_empty() && (id == key || id.ends_with(key) || id.starts_with(key))
}

/// Resolve a section by id (full, tail, or head) or exact title.
fn resolve_section_id(board: &Board, key: &str) -> Result<String, String> {
    if let Some(section) = board.sections.iter().find(|s| !key.is_empty() && s.title == key) {
        return Ok(section.id.clone());
    }
    let matches: Vec<&str> = board
        .sections
        .iter()
        .filter(|s| id_matches(&s.id, key))
        .map(|s| s.id.as_str())
        .collect();
    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(format!("no section matches '{}'", key)),
        _ => Err(format!("section '{}' is ambiguous ({} matches)", key, matches.len())),
    }
}

/// Resolve a todo by id (full, tail, or head). Returns (section_id, todo_id).
fn resolve_todo_id(board: &Board, key: &str) -> Result<(String, String), String> {
    let mut matches: Vec<(String, String)> = Vec::new();
    for section in &board.sections {
        tree::for_each_todo(&section.todos, &mut |todo| {
            if id_matches(&todo.id, key) {
                matches.push((section.id.clone(), todo.id.clone()));
            }
        });
    }
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(format!("no todo matches '{}'", key)),
        _ => Err(format!("todo '{}' is ambiguous ({} matches)", key, matches.len())),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_sections(data_dir: &Path, json: bool) -> CliResult {
    let (_, board) = load_board(data_dir)?;
    if json {
        let infos: Vec<SectionInfoJson> = board
            .sections
            .iter()
            .map(|s| SectionInfoJson {
                id: s.id.clone(),
                title: s.title.clone(),
                todo_count: tree::count_todos(&s.todos),
            })
            .collect();
        return print_json(&infos);
    }
    for section in &board.sections {
        let title = if section.title.is_empty() {
            "(untitled)"
        } else {
            &section.title
        };
        println!(
            "{}  [{}]  {} todos",
            title,
            short_id(&section.id),
            tree::count_todos(&section.todos)
        );
    }
    Ok(())
}

fn cmd_ls(data_dir: &Path, args: LsArgs, json: bool) -> CliResult {
    let (_, board) = load_board(data_dir)?;
    let only = match &args.section {
        Some(key) => Some(resolve_section_id(&board, key)?),
        None => None,
    };
    let sections: Vec<_> = board
        .sections
        .iter()
        .filter(|s| only.as_deref().is_none_or(|id| s.id == id))
        .collect();
    if json {
        let out: Vec<SectionJson> = sections
            .iter()
            .map(|s| SectionJson::from_section(s))
            .collect();
        return print_json(&out);
    }
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render_section_tree(section));
    }
    Ok(())
}

fn cmd_timeline(data_dir: &Path, args: TimelineArgs, json: bool) -> CliResult {
    let (config, board) = load_board(data_dir)?;
    let today = match &args.today {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let rows = crate::ops::timeline::project(&board, today);
    let range = crate::ops::timeline::date_range(&rows, config.timeline.horizon_days);
    if json {
        return print_json(&TimelineJson {
            today,
            start: range.map(|(s, _)| s),
            end: range.map(|(_, e)| e),
            rows,
        });
    }
    print!("{}", render_timeline_text(&rows, range, today));
    Ok(())
}

fn cmd_check(data_dir: &Path, json: bool) -> CliResult {
    let (_, board) = load_board(data_dir)?;
    let result = check::check_board(&board);
    if json {
        return print_json(&result);
    }
    for error in &result.errors {
        println!("error: {:?}", error);
    }
    for warning in &result.warnings {
        println!("warning: {:?}", warning);
    }
    if result.valid && result.warnings.is_empty() {
        println!("ok");
    }
    if !result.valid {
        return Err("board is structurally unsound".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Section commands
// ---------------------------------------------------------------------------

fn cmd_section_add(data_dir: &Path, args: SectionAddArgs) -> CliResult {
    with_board_mut(data_dir, |board| {
        let id = section_ops::add_section(board, args.title.clone());
        println!("added section [{}]", short_id(&id));
        Ok(true)
    })
}

fn cmd_section_rm(data_dir: &Path, args: SectionIdArg) -> CliResult {
    with_board_mut(data_dir, |board| {
        let id = resolve_section_id(board, &args.section)?;
        let removed = section_ops::delete_section(board, &id);
        if removed {
            println!("removed section [{}]", short_id(&id));
        }
        Ok(removed)
    })
}

fn cmd_section_rename(data_dir: &Path, args: SectionRenameArgs) -> CliResult {
    with_board_mut(data_dir, |board| {
        let id = resolve_section_id(board, &args.section)?;
        Ok(section_ops::rename_section(board, &id, args.title.clone()))
    })
}

// ---------------------------------------------------------------------------
// Todo commands
// ---------------------------------------------------------------------------

fn cmd_add(data_dir: &Path, args: AddArgs) -> CliResult {
    let due = match &args.due {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    with_board_mut(data_dir, |board| {
        let (section_id, parent_id) = match (&args.section, &args.parent) {
            (_, Some(parent_key)) => {
                let (section_id, parent_id) = resolve_todo_id(board, parent_key)?;
                (section_id, Some(parent_id))
            }
            (Some(section_key), None) => (resolve_section_id(board, section_key)?, None),
            (None, None) => {
                let first = board
                    .sections
                    .first()
                    .ok_or("board has no sections; run `slate section add` first")?;
                (first.id.clone(), None)
            }
        };
        let Some(section) = board.section_mut(&section_id) else {
            return Ok(false);
        };
        match todo_ops::add_todo_with_text(section, parent_id.as_deref(), args.text.clone(), due)
        {
            Some(id) => {
                println!("added {}", short_id(&id));
                Ok(true)
            }
            None => Err("parent todo not found".into()),
        }
    })
}

fn cmd_set_completed(data_dir: &Path, args: IdArg, completed: bool) -> CliResult {
    with_board_mut(data_dir, |board| {
        let (section_id, todo_id) = resolve_todo_id(board, &args.id)?;
        let Some(section) = board.section_mut(&section_id) else {
            return Ok(false);
        };
        let Some(todo) = tree::find_by_id_mut(&mut section.todos, &todo_id) else {
            return Ok(false);
        };
        let changed = todo.completed != completed;
        todo.completed = completed;
        Ok(changed)
    })
}

fn cmd_due(data_dir: &Path, args: DueArgs) -> CliResult {
    let date = if args.date == "clear" {
        None
    } else {
        Some(parse_date(&args.date)?)
    };
    with_board_mut(data_dir, |board| {
        let (section_id, todo_id) = resolve_todo_id(board, &args.id)?;
        let Some(section) = board.section_mut(&section_id) else {
            return Ok(false);
        };
        Ok(todo_ops::set_due_date(section, &todo_id, date))
    })
}

fn cmd_edit(data_dir: &Path, args: EditArgs) -> CliResult {
    with_board_mut(data_dir, |board| {
        let (section_id, todo_id) = resolve_todo_id(board, &args.id)?;
        let Some(section) = board.section_mut(&section_id) else {
            return Ok(false);
        };
        match todo_ops::commit_edit(section, &todo_id, &args.text) {
            todo_ops::EditOutcome::Committed => Ok(true),
            todo_ops::EditOutcome::DeletedEmpty => {
                println!("deleted {} (empty text)", short_id(&todo_id));
                Ok(true)
            }
            todo_ops::EditOutcome::NotFound => Ok(false),
        }
    })
}

fn cmd_rm(data_dir: &Path, args: IdArg) -> CliResult {
    with_board_mut(data_dir, |board| {
        let (section_id, todo_id) = resolve_todo_id(board, &args.id)?;
        let Some(section) = board.section_mut(&section_id) else {
            return Ok(false);
        };
        Ok(todo_ops::delete_todo(section, &todo_id))
    })
}

fn cmd_mv(data_dir: &Path, args: MvArgs) -> CliResult {
    with_board_mut(data_dir, |board| {
        let (source_section_id, source_todo_id) = resolve_todo_id(board, &args.id)?;
        let source = reorder::DragSource {
            section_id: source_section_id.clone(),
            todo_id: source_todo_id.clone(),
        };

        if let Some(section_key) = &args.to {
            let target_section_id = resolve_section_id(board, section_key)?;
            return Ok(reorder::move_to_root(board, &source, &target_section_id));
        }

        let (target_key, insert_before) = match (&args.before, &args.after) {
            (Some(key), _) => (key, true),
            (None, Some(key)) => (key, false),
            (None, None) => return Err("mv needs one of --before, --after, --to".into()),
        };
        let (target_section_id, target_todo_id) = resolve_todo_id(board, target_key)?;

        // Cycle guard: a todo cannot be dropped into its own subtree.
        let source_todo = board
            .section(&source_section_id)
            .and_then(|s| tree::find_by_id(&s.todos, &source_todo_id))
            .ok_or("source todo vanished")?;
        if tree::is_descendant(source_todo, &target_todo_id) {
            return Err("cannot move a todo into its own subtree".into());
        }

        Ok(reorder::move_todo(
            board,
            &source,
            &target_todo_id,
            &target_section_id,
            insert_before,
        ))
    })
}

fn cmd_promote(data_dir: &Path, args: IdArg) -> CliResult {
    with_board_mut(data_dir, |board| {
        let (section_id, todo_id) = resolve_todo_id(board, &args.id)?;
        section_ops::promote_todo(board, &section_id, &todo_id)?;
        Ok(true)
    })
}
