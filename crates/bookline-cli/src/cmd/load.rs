//! Load subcommand - run the authors then works stages into the store

use std::path::PathBuf;

use anyhow::{Context, Result};
use bookline_core::{Author, MemoryStore, ProgressContext, Work, fmt_num, install_signal_handlers};
use bookline_openlibrary::{AuthorStage, RunSummary, StageStats};
use bookline_store::DuckDbStore;
use clap::Args;

use super::print_table;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Authors dump (plain or .gz)
    #[arg(long)]
    pub authors: Option<PathBuf>,

    /// Works dump (plain or .gz)
    #[arg(long)]
    pub works: Option<PathBuf>,

    /// Skip the authors stage and resolve against authors already stored
    #[arg(long)]
    pub skip_authors: bool,

    /// Records per store write
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// DuckDB database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Parse both dumps into memory without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: LoadArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let mut load_config = config.load_config();
    if let Some(path) = args.authors {
        load_config.authors_dump = path;
    }
    if let Some(path) = args.works {
        load_config.works_dump = path;
    }
    if args.skip_authors {
        load_config.author_stage = AuthorStage::Skip;
    }
    if let Some(n) = args.batch_size {
        anyhow::ensure!(n > 0, "--batch-size must be positive");
        load_config.batch_size = n;
    }

    let mut store_config = config.store_config();
    if let Some(db) = args.db {
        store_config.path = db;
    }

    install_signal_handlers().context("Failed to install signal handlers")?;

    let summary = if args.dry_run {
        log::info!("Dry run: records are kept in memory only");
        let authors: MemoryStore<Author> = MemoryStore::new();
        let works: MemoryStore<Work> = MemoryStore::new();
        bookline_openlibrary::run(&load_config, &authors, &works, progress)?
    } else {
        let store = DuckDbStore::open(&store_config)?;
        bookline_openlibrary::run(&load_config, &store, &store, progress)?
    };

    print_summary(&summary);

    if !summary.is_complete() {
        anyhow::bail!("Load interrupted before the works dump was finished");
    }
    Ok(())
}

fn stage_row(stats: Option<&StageStats>, skipped: &str) -> String {
    match stats {
        Some(s) => format!(
            "{} saved / {} lines ({} parse, {} store failures){}",
            fmt_num(s.records_saved),
            fmt_num(s.lines_scanned),
            fmt_num(s.parse_failures),
            fmt_num(s.store_failures),
            if s.interrupted { " [interrupted]" } else { "" }
        ),
        None => skipped.to_string(),
    }
}

fn print_summary(summary: &RunSummary) {
    print_table(
        "Open Library load",
        &[
            ("Authors", stage_row(summary.authors.as_ref(), "skipped")),
            ("Works", stage_row(summary.works.as_ref(), "not started")),
            ("Failed records", fmt_num(summary.total_failed())),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
}
