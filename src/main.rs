//! Dossier - research session inspector
//!
//! Operator CLI over the durable session snapshots written by the UI's
//! session store.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dossier::{cli, Database, SnapshotRepository};

/// Dossier - research session inspector 📋
#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Database file to operate on (defaults to the platform data dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the stored research session
    Show,
    /// Dump the raw snapshot JSON
    Export,
    /// Delete the stored snapshot
    Clear,
    /// Print the database location
    Path,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let path = match args.db {
        Some(path) => path,
        None => Database::default_path()?,
    };

    if let Command::Path = args.command {
        println!("{}", path.display());
        return Ok(());
    }

    let db = Database::open_at(path)?;
    db.migrate()?;
    let repo = SnapshotRepository::new(db);

    match args.command {
        Command::Show => cli::show(&repo),
        Command::Export => cli::export(&repo),
        Command::Clear => cli::clear(&repo),
        Command::Path => unreachable!("handled above"),
    }
}
