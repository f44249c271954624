//! Deferred records - loaded data whose world is not available yet
//!
//! A record referencing an unloaded world at startup is parked here instead
//! of being dropped. A slow periodic driver calls `retry`, which re-checks
//! world availability and moves loadable records into the registry.

use crate::registry::SpawnerRegistry;
use crate::world::WorldProvider;
use spawnworks_core::SpawnerRecord;
use std::sync::{Mutex, PoisonError};

/// Parking lot for records waiting on their world
pub struct DeferredRecords {
    parked: Mutex<Vec<SpawnerRecord>>,
}

impl DeferredRecords {
    pub fn new() -> Self {
        Self {
            parked: Mutex::new(Vec::new()),
        }
    }

    pub fn park(&self, record: SpawnerRecord) {
        log::warn!(
            "deferring spawner #{} at {}: world not loaded",
            record.id,
            record.position
        );
        self.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Re-attempt every parked record; returns how many were registered
    ///
    /// Records whose world is still unavailable stay parked. A parked record
    /// whose key has meanwhile been taken by a fresh placement is dropped
    /// with a warning - the live record wins.
    pub fn retry(&self, world: &dyn WorldProvider, registry: &SpawnerRegistry) -> usize {
        let parked = std::mem::take(&mut *self.lock());
        if parked.is_empty() {
            return 0;
        }

        let mut registered = 0;
        let mut still_parked = Vec::new();
        for record in parked {
            if !world.is_world_loaded(&record.position.world) {
                still_parked.push(record);
                continue;
            }
            let id = record.id;
            let pos = record.position.clone();
            match registry.insert(record) {
                Ok(()) => {
                    log::info!("registered previously deferred spawner #{id} at {pos}");
                    registered += 1;
                }
                Err(e) => {
                    log::warn!("dropping deferred spawner #{id}: {e}");
                }
            }
        }
        self.lock().extend(still_parked);
        registered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SpawnerRecord>> {
        self.parked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DeferredRecords {
    fn default() -> Self {
        Self::new()
    }
}
