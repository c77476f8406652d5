//! bookline - Open Library dump loader
//!
//! Loads the authors dump, then the works dump with author names resolved,
//! into a DuckDB database.

use anyhow::Result;
use bookline_core::{ProgressContext, Verbosity, init_logging};
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "bookline")]
#[command(about = "Load Open Library author and work dumps into DuckDB")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./bookline.toml or ~/.config/bookline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Load the authors dump, then the works dump
    Load(cmd::load::LoadArgs),
    /// Show stored row counts
    Status(cmd::status::StatusArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = ProgressContext::new();

    // TTY: warn unless --debug, progress bars show activity.
    // Non-TTY: info unless --debug, logs are the only progress indicator.
    let is_tty = progress.is_tty();
    let verbosity = match (cli.debug, is_tty) {
        (true, _) => Verbosity::Debug,
        (false, true) => Verbosity::Quiet,
        (false, false) => Verbosity::Normal,
    };
    let multi = if is_tty { Some(progress.multi()) } else { None };
    init_logging(verbosity, multi)?;

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Load(args) => cmd::load::run(args, &config, &progress),
        Command::Status(args) => cmd::status::run(args, &config),
        Command::Config => {
            let load = config.load_config();
            let store = config.store_config();
            cmd::print_table(
                "Setting",
                &[
                    ("Authors dump", load.authors_dump.display().to_string()),
                    ("Works dump", load.works_dump.display().to_string()),
                    ("Author stage", load.author_stage.to_string()),
                    ("Batch size", load.batch_size.to_string()),
                    ("Store path", store.path.display().to_string()),
                    (
                        "Memory limit",
                        store.memory_limit.unwrap_or_else(|| "default".to_string()),
                    ),
                    (
                        "Threads",
                        store.threads.map_or_else(|| "default".to_string(), |n| n.to_string()),
                    ),
                ],
            );
            Ok(())
        }
    }
}
