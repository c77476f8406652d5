//! Line-by-line scanning of dump files

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::ProgressBar;

use crate::error::RecordError;
use crate::progress::fmt_num;
use crate::stream::ByteCounter;

/// Statistics from scanning one dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub lines_scanned: usize,
    /// Scan stopped early because `stop` was set
    pub interrupted: bool,
}

/// Initial capacity for per-line read buffer
const LINE_BUF_CAPACITY: usize = 4096;

/// Progress update interval (every N lines to avoid overhead)
const UPDATE_INTERVAL: usize = 10_000;

/// Read lines from `reader` and hand each one to `handle` with its 1-based
/// line number. The line terminator (`\n` or `\r\n`) is stripped.
///
/// Lines are read as raw bytes so an invalid UTF-8 line reaches `handle`
/// instead of failing the whole scan. `stop` is checked before every line.
pub fn process_lines<R: BufRead>(
    reader: &mut R,
    counter: &ByteCounter,
    pb: &ProgressBar,
    stop: &AtomicBool,
    mut handle: impl FnMut(usize, &[u8]),
) -> std::io::Result<LineStats> {
    let mut buf = Vec::with_capacity(LINE_BUF_CAPACITY);
    let mut lines_scanned = 0usize;

    loop {
        if stop.load(Ordering::Relaxed) {
            return Ok(LineStats {
                lines_scanned,
                interrupted: true,
            });
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines_scanned += 1;

        if lines_scanned % UPDATE_INTERVAL == 0 {
            pb.set_position(counter.load(Ordering::Relaxed));
            pb.set_message(format!("{} lines", fmt_num(lines_scanned)));
        }

        let mut line = buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        handle(lines_scanned, line);
    }

    pb.set_position(counter.load(Ordering::Relaxed));
    Ok(LineStats {
        lines_scanned,
        interrupted: false,
    })
}

/// Slice a dump line from its first `{`, skipping the tab-separated
/// metadata columns that precede the JSON object.
pub fn json_object(line: &[u8]) -> Result<&str, RecordError> {
    let start = line
        .iter()
        .position(|&b| b == b'{')
        .ok_or(RecordError::NoJson)?;
    std::str::from_utf8(&line[start..]).map_err(RecordError::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::AtomicU64;

    fn scan(input: &[u8], stop: &AtomicBool) -> (LineStats, Vec<(usize, Vec<u8>)>) {
        let mut reader = Cursor::new(input.to_vec());
        let counter = Arc::new(AtomicU64::new(0));
        let mut seen = Vec::new();
        let stats = process_lines(
            &mut reader,
            &counter,
            &ProgressBar::hidden(),
            stop,
            |n, line| seen.push((n, line.to_vec())),
        )
        .unwrap();
        (stats, seen)
    }

    #[test]
    fn numbers_lines_and_strips_terminators() {
        let stop = AtomicBool::new(false);
        let (stats, seen) = scan(b"one\ntwo\r\nthree", &stop);
        assert_eq!(stats.lines_scanned, 3);
        assert!(!stats.interrupted);
        assert_eq!(seen, vec![
            (1, b"one".to_vec()),
            (2, b"two".to_vec()),
            (3, b"three".to_vec()),
        ]);
    }

    #[test]
    fn blank_lines_are_still_handed_over() {
        let stop = AtomicBool::new(false);
        let (stats, seen) = scan(b"a\n\nb\n", &stop);
        assert_eq!(stats.lines_scanned, 3);
        assert_eq!(seen[1], (2, Vec::new()));
    }

    #[test]
    fn invalid_utf8_does_not_abort_scan() {
        let stop = AtomicBool::new(false);
        let (stats, seen) = scan(b"\xff\xfe\nok\n", &stop);
        assert_eq!(stats.lines_scanned, 2);
        assert_eq!(seen[1].1, b"ok".to_vec());
    }

    #[test]
    fn stop_flag_interrupts_before_first_line() {
        let stop = AtomicBool::new(true);
        let (stats, seen) = scan(b"a\nb\n", &stop);
        assert!(stats.interrupted);
        assert_eq!(stats.lines_scanned, 0);
        assert!(seen.is_empty());
    }

    #[test]
    fn stop_flag_set_mid_scan_finishes_current_line() {
        let stop = AtomicBool::new(false);
        let mut reader = Cursor::new(b"a\nb\nc\n".to_vec());
        let counter = Arc::new(AtomicU64::new(0));
        let mut handled = 0;
        let stats = process_lines(&mut reader, &counter, &ProgressBar::hidden(), &stop, |_, _| {
            handled += 1;
            stop.store(true, Ordering::Relaxed);
        })
        .unwrap();
        assert!(stats.interrupted);
        assert_eq!(stats.lines_scanned, 1);
        assert_eq!(handled, 1);
    }

    #[test]
    fn json_object_skips_metadata_prefix() {
        let line = b"/type/author\t/authors/OL1A\t3\t2008-04-01\t{\"key\":\"/authors/OL1A\"}";
        assert_eq!(json_object(line).unwrap(), "{\"key\":\"/authors/OL1A\"}");
    }

    #[test]
    fn json_object_plain_line() {
        assert_eq!(json_object(b"{}").unwrap(), "{}");
    }

    #[test]
    fn json_object_without_brace_fails() {
        assert!(matches!(json_object(b"no json here"), Err(RecordError::NoJson)));
        assert!(matches!(json_object(b""), Err(RecordError::NoJson)));
    }

    #[test]
    fn json_object_invalid_utf8_fails() {
        assert!(matches!(
            json_object(b"{\"name\":\"\xff\"}"),
            Err(RecordError::Encoding(_))
        ));
    }
}
