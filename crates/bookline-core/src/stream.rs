//! Local dump file reading with optional gzip decompression.
//!
//! Open Library publishes dumps as `.txt.gz`; both compressed and plain
//! files are accepted and read through the same buffered interface.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

/// Buffer size for dump reader (256KB)
const DUMP_BUF_SIZE: usize = 256 * 1024;

/// Buffered reader over a (possibly gzipped) dump file
pub type DumpReader = BufReader<Box<dyn Read + Send>>;

/// Shared byte counter for progress tracking
pub type ByteCounter = Arc<AtomicU64>;

/// Whether the path names a gzip-compressed dump
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open dump → (gunzip) → buffered reader with byte counter
///
/// The counter tracks bytes read from disk (compressed bytes for `.gz`),
/// so it lines up with the returned file size for progress display.
///
/// Returns (reader, byte_counter, file_size)
pub fn open_dump(path: &Path) -> io::Result<(DumpReader, ByteCounter, Option<u64>)> {
    let file = File::open(path)?;
    let total_bytes = file.metadata().ok().map(|m| m.len());

    let counter = Arc::new(AtomicU64::new(0));
    let counting = CountingReader {
        inner: file,
        count: counter.clone(),
    };

    let inner: Box<dyn Read + Send> = if is_gzip(path) {
        Box::new(MultiGzDecoder::new(counting))
    } else {
        Box::new(counting)
    };

    Ok((
        BufReader::with_capacity(DUMP_BUF_SIZE, inner),
        counter,
        total_bytes,
    ))
}

/// Reader wrapper that tracks bytes read
pub struct CountingReader<R> {
    inner: R,
    count: ByteCounter,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}
