//! Status subcommand - row counts of an existing store

use std::path::PathBuf;

use anyhow::Result;
use bookline_core::fmt_num;
use bookline_store::DuckDbStore;
use clap::Args;

use super::print_table;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// DuckDB database file
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let mut store_config = config.store_config();
    if let Some(db) = args.db {
        store_config.path = db;
    }
    if !store_config.path.exists() {
        anyhow::bail!("No store at {}", store_config.path.display());
    }

    let counts = DuckDbStore::open(&store_config)?.counts()?;
    print_table(
        "Store",
        &[
            ("Path", store_config.path.display().to_string()),
            ("Authors", fmt_num(counts.authors as usize)),
            ("Works", fmt_num(counts.works as usize)),
        ],
    );
    Ok(())
}
