//! Bookline Open Library - two-stage dump loader
//!
//! Loads the Open Library authors dump, then the works dump, resolving each
//! work's author keys to author names against the records written by the
//! first stage.
//!
//! # Example
//!
//! ```no_run
//! use bookline_core::{MemoryStore, ProgressContext};
//! use bookline_openlibrary::{LoadConfig, run};
//!
//! let config = LoadConfig {
//!     authors_dump: "ol_dump_authors_latest.txt.gz".into(),
//!     works_dump: "ol_dump_works_latest.txt.gz".into(),
//!     ..Default::default()
//! };
//!
//! let authors: MemoryStore<bookline_core::Author> = MemoryStore::new();
//! let works: MemoryStore<bookline_core::Work> = MemoryStore::new();
//! let summary = run(&config, &authors, &works, &ProgressContext::hidden())
//!     .expect("Pipeline failed");
//! println!("Saved {} works", summary.works.map_or(0, |s| s.records_saved));
//! ```

pub mod config;
pub mod loader;
pub mod runner;
pub mod transform;

// Re-exports for convenience
pub use config::{AuthorStage, LoadConfig};
pub use loader::{AuthorIndex, StageContext, StageStats, UNKNOWN_AUTHOR, load_authors, load_works};
pub use runner::{RunSummary, run};
