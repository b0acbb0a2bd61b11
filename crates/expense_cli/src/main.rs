//! Command line front end for the expense tracker.
//!
//! # Responsibility
//! - Drive the same tracker session the UI uses: form submit, slice click,
//!   change-feed pump, chart render.
//! - Keep stdout deterministic; diagnostics go to stderr.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use expense_core::{
    core_version, Expense, ExpenseDocument, ExpenseId, ExpenseStore, ExpenseTracker, InteractionOutcome,
    SliceEvent, SqliteExpenseStore, SubmitOutcome, TrackerConfig,
};
use flexi_logger::Logger;
use log::debug;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "expenses", version, about = "Track expenses and chart them as a pie")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// SQLite database file
    #[arg(long, env = "EXPENSES_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Collection holding the expense documents
    #[arg(long, env = "EXPENSES_COLLECTION", global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a new expense through the entry form
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        cost: String,
    },
    /// Replace name and cost of an existing expense
    Update {
        id: ExpenseId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: i64,
    },
    /// Delete an expense by clicking its slice
    Delete { id: ExpenseId },
    /// Print the mirrored expenses in chart order
    List,
    /// Write the settled chart as SVG
    Render {
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Print the core version
    Version,
}

fn init_logging(verbose: u8) -> Result<flexi_logger::LoggerHandle> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Logger::try_with_env_or_str(level)
        .context("invalid log specification")?
        .log_to_stderr()
        .start()
        .context("failed to start logger")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose)?;

    let mut config = TrackerConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }
    if let Some(collection) = cli.collection {
        config.collection = collection;
    }

    let settled_ms = config.chart.transition_ms;
    debug!(
        "event=cli_start module=cli status=ok collection={} db_path={:?}",
        config.collection, config.db_path
    );

    match cli.command {
        Command::Version => println!("expense_core version={}", core_version()),
        Command::Add { name, cost } => {
            let mut tracker = open_tracker(&config)?;
            tracker.form_mut().set_name(name);
            tracker.form_mut().set_cost(cost);
            match tracker.submit_form() {
                SubmitOutcome::Created(id) => println!("added {id}"),
                SubmitOutcome::Rejected => bail!("{}", tracker.form().error),
                SubmitOutcome::StoreFailed => bail!("store rejected the expense"),
            }
        }
        Command::Update { id, name, cost } => {
            let mut tracker = open_tracker(&config)?;
            let collection = tracker.collection().to_string();
            tracker
                .store_mut()
                .update(&collection, id, &ExpenseDocument::new(name, cost))
                .with_context(|| format!("failed to update {id}"))?;
            println!("updated {id}");
        }
        Command::Delete { id } => {
            let mut tracker = open_tracker(&config)?;
            match tracker.handle_slice_event(SliceEvent::Click(id), settled_ms) {
                InteractionOutcome::DeleteRequested(id) => {
                    tracker.pump(settled_ms);
                    println!("deleted {id}");
                }
                _ => return Err(anyhow!("no expense with id {id}")),
            }
        }
        Command::List => print_list(&open_tracker(&config)?),
        Command::Render { out } => {
            let mut tracker = open_tracker(&config)?;
            tracker.tick(settled_ms);
            let svg = tracker.svg(settled_ms);
            match out {
                Some(path) => {
                    std::fs::write(&path, svg)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => print!("{svg}"),
            }
        }
    }

    Ok(())
}

/// Opens the store and applies its initial snapshot.
fn open_tracker(config: &TrackerConfig) -> Result<ExpenseTracker<SqliteExpenseStore>> {
    let mut tracker = ExpenseTracker::open(config).context("failed to open expense store")?;
    tracker.pump(0);
    Ok(tracker)
}

fn print_list(tracker: &ExpenseTracker<SqliteExpenseStore>) {
    for expense in tracker.mirror() {
        println!("{}\t{}\t{}", expense.id, expense.name, expense.cost);
    }
    println!("total\t{}", list_total(tracker.mirror()));
}

/// Sum of all costs. Widened so any set of stored `i64` costs fits.
fn list_total(expenses: &[Expense]) -> i128 {
    expenses.iter().map(|expense| i128::from(expense.cost)).sum()
}
