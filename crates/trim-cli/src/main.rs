mod commands;

use clap::{Parser, Subcommand};
use trim_core::model::{Importance, Mode};
use trim_core::tree::Section;
use trim_store::JsonStore;

#[derive(Parser)]
#[command(name = "trim", about = "Time-boxed personal decisions", version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Trim workspace in the current directory
    Init,

    /// List decisions by section
    List {
        /// Only this section (active, overdue, resolved)
        #[arg(long)]
        section: Option<Section>,
    },

    /// Show one decision in full
    Show {
        /// Decision ID (full or unique prefix)
        id: String,
    },

    /// Add a decision, or a sub-decision with --parent
    Add {
        /// What is being decided
        title: String,

        /// Category (root decisions only; defaults to the first category)
        #[arg(short, long)]
        category: Option<String>,

        /// trivial, low, medium, high or critical
        #[arg(short, long, default_value = "medium")]
        importance: Importance,

        /// do_or_not, choose_best or no_clear_options
        #[arg(short, long, default_value = "choose_best")]
        mode: Mode,

        /// Parent decision ID; sub-decisions inherit its category
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Change a decision's fields, framing or links
    Edit(commands::edit::EditArgs),

    /// Manage a decision's options
    Option {
        #[command(subcommand)]
        action: OptionAction,
    },

    /// Switch a decision to another mode
    Mode {
        /// Decision ID
        id: String,

        /// do_or_not, choose_best or no_clear_options
        mode: Mode,
    },

    /// Commit to the selected option
    Trim {
        /// Decision ID
        id: String,
    },

    /// Put a trimmed decision back on the board
    Reopen {
        /// Decision ID
        id: String,
    },

    /// Delete a decision and all of its sub-decisions
    Delete {
        /// Decision ID
        id: String,
    },

    /// Move a decision under another one, or back to the top level
    Move {
        /// Decision ID
        id: String,

        /// New parent decision ID
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Make it a top-level decision
        #[arg(long)]
        root: bool,
    },

    /// Set the order of a parent's children or of a section's roots
    Reorder {
        /// Decision IDs in their new order; must list every member
        #[arg(required = true)]
        ids: Vec<String>,

        /// Reorder this decision's children
        #[arg(long, conflicts_with = "section")]
        parent: Option<String>,

        /// Reorder the roots of this section
        #[arg(long, default_value = "active")]
        section: Section,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Inspect or re-run the built-in examples
    Samples {
        #[command(subcommand)]
        action: SamplesAction,
    },
}

#[derive(Subcommand)]
enum OptionAction {
    /// Add an option
    Add {
        /// Decision ID
        id: String,
        /// Option title
        title: String,
    },
    /// Edit an option
    Edit {
        /// Decision ID
        id: String,
        /// Option ID, ID prefix or 1-based position
        option: String,
        #[arg(long)]
        title: Option<String>,
        /// Free-text note; an empty string clears it
        #[arg(long)]
        memo: Option<String>,
        /// Replace the pros (repeatable)
        #[arg(long)]
        pro: Vec<String>,
        /// Replace the cons (repeatable)
        #[arg(long)]
        con: Vec<String>,
    },
    /// Remove an option
    Remove {
        /// Decision ID
        id: String,
        /// Option ID, ID prefix or 1-based position
        option: String,
    },
    /// Select an option; selecting it again clears the selection
    Select {
        /// Decision ID
        id: String,
        /// Option ID, ID prefix or 1-based position
        option: String,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Add a category
    Add {
        name: String,
    },
    /// Rename a category and every decision using it
    Rename {
        old: String,
        new: String,
    },
    /// Delete an unused category
    Delete {
        name: String,
    },
}

#[derive(Subcommand)]
enum SamplesAction {
    /// Show the sample pack and what has been deleted
    Status,
    /// Merge the sample pack again
    Sync {
        /// Forget deleted samples and restart their deadlines
        #[arg(long)]
        force: bool,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TRIM_LOG").unwrap_or_else(|_| {
        let level = std::env::current_dir()
            .ok()
            .and_then(|cwd| JsonStore::discover(cwd).ok())
            .map(|store| store.config().log.level)
            .unwrap_or_else(|| "warn".to_string());
        tracing_subscriber::EnvFilter::try_new(level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::List { section } => commands::list::run(section, cli.json),
        Commands::Show { id } => commands::show::run(id, cli.json),
        Commands::Add {
            title,
            category,
            importance,
            mode,
            parent,
        } => commands::add::run(title, category, importance, mode, parent, cli.json),
        Commands::Edit(args) => commands::edit::run(args),
        Commands::Option { action } => match action {
            OptionAction::Add { id, title } => commands::option::add(id, title, cli.json),
            OptionAction::Edit {
                id,
                option,
                title,
                memo,
                pro,
                con,
            } => commands::option::edit(id, option, title, memo, pro, con),
            OptionAction::Remove { id, option } => commands::option::remove(id, option),
            OptionAction::Select { id, option } => commands::option::select(id, option),
        },
        Commands::Mode { id, mode } => commands::mode::run(id, mode),
        Commands::Trim { id } => commands::trim::run(id),
        Commands::Reopen { id } => commands::trim::reopen(id),
        Commands::Delete { id } => commands::delete::run(id, cli.json),
        Commands::Move { id, parent, root } => commands::relocate::run(id, parent, root),
        Commands::Reorder {
            ids,
            parent,
            section,
        } => commands::reorder::run(ids, parent, section),
        Commands::Category { action } => match action {
            CategoryAction::List => commands::category::list(cli.json),
            CategoryAction::Add { name } => commands::category::add(name),
            CategoryAction::Rename { old, new } => commands::category::rename(old, new),
            CategoryAction::Delete { name } => commands::category::delete(name),
        },
        Commands::Samples { action } => match action {
            SamplesAction::Status => commands::samples::status(cli.json),
            SamplesAction::Sync { force } => commands::samples::sync(force, cli.json),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
