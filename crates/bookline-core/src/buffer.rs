//! Write buffer that groups parsed records into store batches

use rustc_hash::FxHashSet;

use crate::model::Keyed;

/// Default number of records per store batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Records ready to be written in one store call.
#[derive(Debug)]
pub struct Batch<E> {
    /// 1-based dump line of each record, for diagnostics
    pub lines: Vec<usize>,
    /// Last occurrence of each id, in source order
    pub records: Vec<E>,
    /// Earlier occurrences overwritten by a later line in the same batch,
    /// with their dump lines
    pub superseded: Vec<(usize, E)>,
}

impl<E> Batch<E> {
    /// Number of records in the batch write
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records pushed into the buffer, superseded ones included
    pub fn pushed(&self) -> usize {
        self.records.len() + self.superseded.len()
    }

    /// Every pushed record with its dump line, in source order.
    ///
    /// Replaying these one by one gives the same end state as writing each
    /// line as it was read.
    pub fn in_source_order(&self) -> Vec<(usize, &E)> {
        let mut all: Vec<(usize, &E)> = self
            .lines
            .iter()
            .copied()
            .zip(&self.records)
            .chain(self.superseded.iter().map(|(line, record)| (*line, record)))
            .collect();
        all.sort_by_key(|(line, _)| *line);
        all
    }
}

/// Buffers parsed records until `capacity` is reached.
#[derive(Debug)]
pub struct RecordBuffer<E> {
    lines: Vec<usize>,
    records: Vec<E>,
    capacity: usize,
}

impl<E: Keyed> RecordBuffer<E> {
    /// A capacity of 0 is treated as 1 (write every record immediately).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Vec::with_capacity(capacity),
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: usize, record: E) {
        self.lines.push(line);
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Take buffered records, keeping only the last occurrence of each id.
    ///
    /// Surviving records keep their relative order; earlier occurrences are
    /// kept aside in [`Batch::superseded`].
    pub fn take(&mut self) -> Batch<E> {
        let lines = std::mem::take(&mut self.lines);
        let records = std::mem::take(&mut self.records);

        let keep: Vec<bool> = {
            let mut seen = FxHashSet::default();
            let mut keep: Vec<bool> = records.iter().rev().map(|r| seen.insert(r.id())).collect();
            keep.reverse();
            keep
        };
        let kept = keep.iter().filter(|k| **k).count();

        let mut batch = Batch {
            lines: Vec::with_capacity(kept),
            records: Vec::with_capacity(kept),
            superseded: Vec::with_capacity(records.len() - kept),
        };
        for ((line, record), keep) in lines.into_iter().zip(records).zip(keep) {
            if keep {
                batch.lines.push(line);
                batch.records.push(record);
            } else {
                batch.superseded.push((line, record));
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;

    fn author(id: &str, name: &str) -> Author {
        Author {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn fills_to_capacity() {
        let mut buf = RecordBuffer::new(2);
        buf.push(1, author("OL1A", "a"));
        assert!(!buf.is_full());
        buf.push(2, author("OL2A", "b"));
        assert!(buf.is_full());
    }

    #[test]
    fn zero_capacity_flushes_every_record() {
        let mut buf = RecordBuffer::new(0);
        buf.push(1, author("OL1A", "a"));
        assert!(buf.is_full());
    }

    #[test]
    fn take_resets_buffer() {
        let mut buf = RecordBuffer::new(10);
        buf.push(1, author("OL1A", "a"));
        let batch = buf.take();
        assert_eq!(batch.len(), 1);
        assert!(buf.is_empty());
        assert!(buf.take().is_empty());
    }

    #[test]
    fn take_keeps_last_occurrence_of_each_id() {
        let mut buf = RecordBuffer::new(10);
        buf.push(1, author("OL1A", "first"));
        buf.push(2, author("OL2A", "other"));
        buf.push(3, author("OL1A", "last"));

        let batch = buf.take();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.pushed(), 3);
        assert_eq!(batch.lines, vec![2, 3]);
        let names: Vec<_> = batch.records.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["other", "last"]);
        assert_eq!(batch.superseded.len(), 1);
        assert_eq!(batch.superseded[0].0, 1);
        assert_eq!(batch.superseded[0].1.name, "first");
    }

    #[test]
    fn source_order_includes_superseded_records() {
        let mut buf = RecordBuffer::new(10);
        buf.push(4, author("OL1A", "first"));
        buf.push(5, author("OL2A", "other"));
        buf.push(6, author("OL1A", "second"));
        buf.push(7, author("OL1A", "last"));

        let batch = buf.take();
        let replay: Vec<_> = batch
            .in_source_order()
            .into_iter()
            .map(|(line, a)| (line, a.name.as_str()))
            .collect();
        assert_eq!(
            replay,
            vec![(4, "first"), (5, "other"), (6, "second"), (7, "last")]
        );
    }
}
