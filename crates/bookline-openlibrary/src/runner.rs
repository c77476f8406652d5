//! Pipeline orchestration: authors stage, then works stage

use std::time::{Duration, Instant};

use bookline_core::{Author, ProgressContext, RecordStore, Work, shutdown_flag};

use crate::config::{AuthorStage, LoadConfig};
use crate::loader::{AuthorIndex, StageContext, StageStats, load_authors, load_works};

/// Run the two-stage Open Library load.
///
/// Authors are written to `authors` (unless skipped) before any work line
/// is read; works are written to `works`. The two stores may be the same
/// backend. An interrupted author stage ends the run without starting works.
pub fn run<A, W>(
    config: &LoadConfig,
    authors: &A,
    works: &W,
    progress: &ProgressContext,
) -> anyhow::Result<RunSummary>
where
    A: RecordStore<Author>,
    W: RecordStore<Work>,
{
    let start = Instant::now();
    let ctx = StageContext {
        batch_size: config.batch_size,
        progress,
        stop: shutdown_flag(),
    };

    let index = match config.author_stage {
        AuthorStage::Load => load_authors(&config.authors_dump, authors, &ctx)?,
        AuthorStage::Skip => {
            log::info!("Skipping author stage, resolving against stored authors");
            AuthorIndex::preloaded(authors)
        }
    };
    let author_stats = index.stats().cloned();

    if author_stats.as_ref().is_some_and(|s| s.interrupted) {
        log::warn!("Author stage interrupted, works stage not started");
        let summary = RunSummary {
            authors: author_stats,
            works: None,
            elapsed: start.elapsed(),
        };
        summary.log();
        return Ok(summary);
    }

    let work_stats = load_works(&config.works_dump, &index, works, &ctx)?;

    let summary = RunSummary {
        authors: author_stats,
        works: Some(work_stats),
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

/// Summary of pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// `None` when the author stage was skipped
    pub authors: Option<StageStats>,
    /// `None` when the run stopped before the works stage
    pub works: Option<StageStats>,
    pub elapsed: Duration,
}

impl RunSummary {
    fn stages(&self) -> impl Iterator<Item = &StageStats> {
        self.authors.iter().chain(self.works.iter())
    }

    /// Whether the works stage ran to the end of its dump
    pub fn is_complete(&self) -> bool {
        self.works.as_ref().is_some_and(|w| !w.interrupted)
    }

    pub fn total_saved(&self) -> usize {
        self.stages().map(|s| s.records_saved).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.stages().map(StageStats::failed_records).sum()
    }

    pub fn log(&self) {
        log::info!("=== Load Summary ===");
        match &self.authors {
            Some(s) => s.log(),
            None => log::info!("authors: skipped"),
        }
        match &self.works {
            Some(s) => s.log(),
            None => log::info!("works: not started"),
        }
        log::info!(
            "Total: {} saved, {} failed in {:.1}s",
            self.total_saved(),
            self.total_failed(),
            self.elapsed.as_secs_f64()
        );
    }
}
