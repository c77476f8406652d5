//! Open Library load configuration

use std::path::PathBuf;

use bookline_core::DEFAULT_BATCH_SIZE;

/// Whether the author stage runs before the work stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorStage {
    /// Load the authors dump first
    #[default]
    Load,
    /// Authors are already in the store; resolve against them as-is
    Skip,
}

impl std::fmt::Display for AuthorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Runtime configuration for the two-stage load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Authors dump (plain or `.gz`)
    pub authors_dump: PathBuf,
    /// Works dump (plain or `.gz`)
    pub works_dump: PathBuf,
    pub author_stage: AuthorStage,
    /// Records per store write
    pub batch_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            authors_dump: PathBuf::from("ol_dump_authors_latest.txt.gz"),
            works_dump: PathBuf::from("ol_dump_works_latest.txt.gz"),
            author_stage: AuthorStage::Load,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
