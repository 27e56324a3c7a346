use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slate", about = concat!("[#] slate v", env!("CARGO_PKG_VERSION"), " - a sectioned todo board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sections
    Sections,
    /// Manage sections
    Section(SectionCmd),
    /// Add a todo
    Add(AddArgs),
    /// List todos as a tree
    Ls(LsArgs),
    /// Mark a todo completed
    Done(IdArg),
    /// Mark a todo not completed
    Undone(IdArg),
    /// Set or clear a due date
    Due(DueArgs),
    /// Replace a todo's text (empty text deletes it)
    Edit(EditArgs),
    /// Delete a todo and its subtree
    Rm(IdArg),
    /// Move a todo before/after another, or to a section root
    Mv(MvArgs),
    /// Make a todo a child of the task above it
    Promote(IdArg),
    /// Show the timeline
    Timeline(TimelineArgs),
    /// Validate board integrity
    Check,
}

#[derive(Args)]
pub struct SectionCmd {
    #[command(subcommand)]
    pub command: SectionCommands,
}

#[derive(Subcommand)]
pub enum SectionCommands {
    /// Add a new section
    Add(SectionAddArgs),
    /// Delete a section and every todo in it
    Rm(SectionIdArg),
    /// Rename a section
    Rename(SectionRenameArgs),
}

#[derive(Args)]
pub struct SectionAddArgs {
    /// Section title (sections may start untitled)
    #[arg(default_value = "")]
    pub title: String,
}

#[derive(Args)]
pub struct SectionIdArg {
    /// Section id (unique prefix) or exact title
    pub section: String,
}

#[derive(Args)]
pub struct SectionRenameArgs {
    /// Section id (unique prefix) or exact title
    pub section: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Todo text
    pub text: String,
    /// Section to add to (default: first section)
    #[arg(long)]
    pub section: Option<String>,
    /// Add as a child of this todo
    #[arg(long)]
    pub parent: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct LsArgs {
    /// Limit to one section
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Todo id (unique prefix)
    pub id: String,
}

#[derive(Args)]
pub struct DueArgs {
    /// Todo id (unique prefix)
    pub id: String,
    /// Due date (YYYY-MM-DD), or "clear"
    pub date: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo id (unique prefix)
    pub id: String,
    /// New text
    pub text: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Todo id (unique prefix)
    pub id: String,
    /// Insert before this todo
    #[arg(long, conflicts_with_all = ["after", "to"])]
    pub before: Option<String>,
    /// Insert after this todo
    #[arg(long, conflicts_with = "to")]
    pub after: Option<String>,
    /// Append to this section's root
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct TimelineArgs {
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<String>,
}
