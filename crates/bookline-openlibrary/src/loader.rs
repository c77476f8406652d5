//! Author and work loader stages
//!
//! Both stages share one scan loop: read the dump line by line, parse each
//! line into an entity, buffer it, and upsert full batches. Every per-record
//! failure (parse or store) is logged, counted, and skipped. Only failing to
//! open or read the dump fails the stage.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use anyhow::Context;
use bookline_core::{
    Author, Keyed, ProgressContext, RecordBuffer, RecordError, RecordStore, StoreError, Work,
    open_dump, process_lines,
};

use crate::transform::{AuthorRow, WorkRow, parse_line};

/// Name recorded when a work references an author that is not in the store
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Shared settings for one stage run
pub struct StageContext<'a> {
    /// Records per store write
    pub batch_size: usize,
    pub progress: &'a ProgressContext,
    /// Checked before every line; set by the signal handler
    pub stop: &'a AtomicBool,
}

/// Statistics from one loader stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub stage: &'static str,
    pub lines_scanned: usize,
    pub records_saved: usize,
    pub parse_failures: usize,
    pub store_failures: usize,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl StageStats {
    fn new(stage: &'static str) -> Self {
        Self {
            stage,
            lines_scanned: 0,
            records_saved: 0,
            parse_failures: 0,
            store_failures: 0,
            elapsed: Duration::ZERO,
            interrupted: false,
        }
    }

    pub fn failed_records(&self) -> usize {
        self.parse_failures + self.store_failures
    }

    fn record_failure(&mut self, line: usize, err: &RecordError) {
        if err.is_store() {
            self.store_failures += 1;
            log::warn!("{} line {line}: store failure: {err}", self.stage);
        } else {
            self.parse_failures += 1;
            log::warn!("{} line {line}: skipped: {err}", self.stage);
        }
    }

    pub fn log(&self) {
        log::info!(
            "{}: {} saved from {} lines ({} parse failures, {} store failures) in {:.1}s{}",
            self.stage,
            self.records_saved,
            self.lines_scanned,
            self.parse_failures,
            self.store_failures,
            self.elapsed.as_secs_f64(),
            if self.interrupted { " [interrupted]" } else { "" }
        );
    }
}

/// Author lookup handle for the work stage.
///
/// Only obtainable from [`load_authors`] or, when the author stage is
/// skipped on purpose, [`AuthorIndex::preloaded`]. [`load_works`] requires
/// one, so works can never be loaded ahead of their authors by accident.
pub struct AuthorIndex<'s, S> {
    store: &'s S,
    stats: Option<StageStats>,
}

impl<'s, S: RecordStore<Author>> AuthorIndex<'s, S> {
    /// Use authors already present in `store` from an earlier run.
    pub fn preloaded(store: &'s S) -> Self {
        Self { store, stats: None }
    }

    /// Author stage statistics; `None` if the stage was skipped
    pub fn stats(&self) -> Option<&StageStats> {
        self.stats.as_ref()
    }

    /// Author name for `author_id`, or [`UNKNOWN_AUTHOR`] on a miss
    pub fn resolve(&self, author_id: &str) -> Result<String, StoreError> {
        Ok(self
            .store
            .find_by_id(author_id)?
            .map_or_else(|| UNKNOWN_AUTHOR.to_string(), |author| author.name))
    }
}

/// Stage 1: load the authors dump into `store`.
pub fn load_authors<'s, S: RecordStore<Author>>(
    path: &Path,
    store: &'s S,
    ctx: &StageContext<'_>,
) -> anyhow::Result<AuthorIndex<'s, S>> {
    let stats = run_stage("authors", path, store, ctx, |line| {
        parse_line::<AuthorRow>(line).map(AuthorRow::into_author)
    })?;
    Ok(AuthorIndex {
        store,
        stats: Some(stats),
    })
}

/// Stage 2: load the works dump into `store`, resolving author names through `authors`.
pub fn load_works<A, W>(
    path: &Path,
    authors: &AuthorIndex<'_, A>,
    store: &W,
    ctx: &StageContext<'_>,
) -> anyhow::Result<StageStats>
where
    A: RecordStore<Author>,
    W: RecordStore<Work>,
{
    run_stage("works", path, store, ctx, |line| {
        parse_line::<WorkRow>(line)?.into_work(|id| authors.resolve(id))
    })
}

fn run_stage<E, S>(
    stage: &'static str,
    path: &Path,
    store: &S,
    ctx: &StageContext<'_>,
    mut parse: impl FnMut(&[u8]) -> Result<E, RecordError>,
) -> anyhow::Result<StageStats>
where
    E: Keyed,
    S: RecordStore<E>,
{
    let start = Instant::now();
    log::info!("Loading {stage} from {}", path.display());

    let (mut reader, counter, total_bytes) = open_dump(path)
        .with_context(|| format!("failed to open {stage} dump: {}", path.display()))?;
    let pb = ctx.progress.stage_bar(stage, total_bytes);

    let mut stats = StageStats::new(stage);
    let mut buffer = RecordBuffer::new(ctx.batch_size);

    let scan = process_lines(&mut reader, &counter, &pb, ctx.stop, |line_no, line| {
        match parse(line) {
            Ok(record) => {
                buffer.push(line_no, record);
                if buffer.is_full() {
                    flush(store, &mut buffer, &mut stats);
                }
            }
            Err(e) => stats.record_failure(line_no, &e),
        }
    });
    // Keep what was parsed before a read error or interruption
    flush(store, &mut buffer, &mut stats);
    pb.finish_and_clear();

    let lines =
        scan.with_context(|| format!("failed to read {stage} dump: {}", path.display()))?;
    stats.lines_scanned = lines.lines_scanned;
    stats.interrupted = lines.interrupted;
    stats.elapsed = start.elapsed();
    stats.log();
    Ok(stats)
}

/// Write the buffered batch; on failure replay every buffered line one by
/// one in source order, so only the failing records are lost.
fn flush<E, S>(store: &S, buffer: &mut RecordBuffer<E>, stats: &mut StageStats)
where
    E: Keyed,
    S: RecordStore<E>,
{
    if buffer.is_empty() {
        return;
    }
    let batch = buffer.take();

    match store.save_batch(&batch.records) {
        Ok(()) => {
            for record in &batch.records {
                log::debug!("{} {} saved", stats.stage, record.id());
            }
            // Superseded lines count as saved once the batch commits
            stats.records_saved += batch.pushed();
        }
        Err(e) => {
            log::warn!(
                "{}: batch of {} failed ({e}), retrying one by one",
                stats.stage,
                batch.pushed()
            );
            for (line_no, record) in batch.in_source_order() {
                match store.save(record) {
                    Ok(()) => {
                        log::debug!("{} {} saved", stats.stage, record.id());
                        stats.records_saved += 1;
                    }
                    Err(e) => stats.record_failure(line_no, &RecordError::Store(e)),
                }
            }
        }
    }
}
