//! Tick scheduler - the periodic driver
//!
//! Fired by the embedding application at the configured period, from one
//! logical thread (the world collaborator is not safe for concurrent
//! mutation). Each firing visits at most `max_per_cycle` records via the
//! registry's round-robin batch iterator, so per-cycle cost stays
//! O(max_per_cycle) no matter how large the registry grows.
//!
//! Per visited record: a snapshot is cloned under the lock, all decisions
//! and world calls run lock-free, and the scheduler-owned fields
//! (timestamps, stored count, released total) are written back only if the
//! record still exists with the same product.

use crate::persistence::Persistence;
use crate::registry::SpawnerRegistry;
use crate::storage::StorageSystem;
use crate::world::WorldProvider;
use spawnworks_core::{
    compute_target, BlockPos, EngineConfig, SpawnRng, SpawnerRecord, MS_PER_TICK,
};
use std::sync::{Arc, Mutex, PoisonError};

/// What one scheduler firing did
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Records visited this cycle
    pub scanned: usize,
    /// Units emitted by the normal emission path
    pub emitted: u32,
    /// Units banked into storage pools
    pub banked: u32,
    /// Stored units released back into the world
    pub released: u32,
    /// Records whose underlying block is gone; removal is the caller's job
    pub missing: Vec<BlockPos>,
}

/// Budgeted batch driver over the registry
pub struct TickScheduler {
    registry: Arc<SpawnerRegistry>,
    world: Arc<dyn WorldProvider>,
    persistence: Arc<dyn Persistence>,
    storage: StorageSystem,
    max_per_cycle: usize,
    rng: Mutex<SpawnRng>,
}

impl TickScheduler {
    pub fn new(
        registry: Arc<SpawnerRegistry>,
        world: Arc<dyn WorldProvider>,
        persistence: Arc<dyn Persistence>,
        config: &EngineConfig,
        seed: u64,
    ) -> Self {
        Self {
            registry,
            world,
            persistence,
            storage: StorageSystem::from_config(config),
            max_per_cycle: config.max_per_cycle.max(1),
            rng: Mutex::new(SpawnRng::new(seed)),
        }
    }

    /// Process one cycle at the given monotonic time
    pub fn tick(&self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();
        let batch = self.registry.next_batch(self.max_per_cycle);

        for pos in batch {
            // Removed mid-batch: never revisited.
            let Some(mut record) = self.registry.get(&pos) else {
                continue;
            };
            report.scanned += 1;

            if !self.world.is_world_loaded(&record.position.world) {
                continue;
            }
            if !self.world.block_exists(&record.position) {
                report.missing.push(pos);
                continue;
            }

            // Exactly one of emission / accumulation per cycle; they share
            // the last_emit_ms clock and must not both advance it.
            let mut banked = false;
            if record.active {
                report.emitted += self.try_emit(&mut record, now_ms);
            } else {
                banked = self.storage.accumulate(&mut record, now_ms);
                if banked {
                    report.banked += 1;
                }
            }

            let released = {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                self.storage
                    .release(&mut record, now_ms, self.world.as_ref(), &mut rng)
            };
            report.released += released;

            self.apply(&pos, &record);
            if banked || released > 0 {
                self.persistence.save_record(&record);
            }
        }

        report
    }

    /// Normal emission: due, under the population cap, `emit_count` attempts
    fn try_emit(&self, record: &mut SpawnerRecord, now_ms: u64) -> u32 {
        let delay_ms = u64::from(record.params.emit_delay_ticks) * MS_PER_TICK;
        if now_ms.saturating_sub(record.last_emit_ms) < delay_ms {
            return 0;
        }

        let nearby = self.world.nearby_count_of(
            &record.position,
            record.params.activation_range,
            &record.product,
        );
        if nearby >= record.params.max_nearby {
            // Capacity, not an error: defer without advancing the clock.
            return 0;
        }

        let mut emitted = 0;
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for _ in 0..record.params.emit_count {
                let target = compute_target(record, &mut rng);
                if self.world.is_location_acceptable(&target, &record.product)
                    && self.world.materialize(&target, &record.product)
                {
                    emitted += 1;
                }
            }
        }
        // The attempt happened: stamp even if the world rejected every unit.
        record.last_emit_ms = now_ms;
        emitted
    }

    /// Write scheduler-owned fields back to the live record
    fn apply(&self, pos: &BlockPos, processed: &SpawnerRecord) {
        self.registry.update(pos, |live| {
            // A concurrent product switch discarded the pool this cycle was
            // computed against; dropping the write-back keeps the reset.
            if live.product != processed.product {
                return;
            }
            live.last_emit_ms = processed.last_emit_ms;
            live.last_release_ms = processed.last_release_ms;
            live.stored_count = processed.stored_count.min(live.params.max_storage);
            live.released_total = processed.released_total;
        });
    }
}
