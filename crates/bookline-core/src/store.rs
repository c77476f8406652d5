//! Keyed record store abstraction and an in-memory implementation

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::error::StoreError;
use crate::model::Keyed;

/// Upsert-by-id / lookup-by-id persistence for one entity type.
///
/// Methods take `&self` so one backend can serve as both the author lookup
/// source and the work sink during the same stage.
pub trait RecordStore<E: Keyed> {
    /// Insert or overwrite the record with `entity.id()`.
    fn save(&self, entity: &E) -> Result<(), StoreError>;

    /// Upsert many records in order. Later entries win on repeated ids.
    fn save_batch(&self, entities: &[E]) -> Result<(), StoreError> {
        entities.iter().try_for_each(|e| self.save(e))
    }

    /// Point lookup. `Ok(None)` is a normal miss, not an error.
    fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError>;
}

/// Hash-map backed store for tests and dry runs.
#[derive(Debug)]
pub struct MemoryStore<E> {
    records: RefCell<FxHashMap<String, E>>,
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Clone> MemoryStore<E> {
    /// Snapshot of a stored record
    pub fn get(&self, id: &str) -> Option<E> {
        self.records.borrow().get(id).cloned()
    }
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Keyed + Clone> RecordStore<E> for MemoryStore<E> {
    fn save(&self, entity: &E) -> Result<(), StoreError> {
        self.records
            .borrow_mut()
            .insert(entity.id().to_string(), entity.clone());
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        Ok(self.get(id))
    }
}
