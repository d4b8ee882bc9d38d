//! Single-slot snapshot storage.

use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// Replace/read contract for the snapshot slot.
///
/// Implementations hold at most one payload. `save` overwrites it wholesale
/// and `load` returns exactly what was last saved, with no schema check in
/// either direction.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, payload: Value);

    /// `None` only when nothing has ever been saved.
    fn load(&self) -> Option<Value>;
}

/// In-memory slot, empty at process start. Concurrent savers race and the
/// last write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, payload: Value) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(payload);
    }

    fn load(&self) -> Option<Value> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
