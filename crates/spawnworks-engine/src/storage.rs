//! Storage accumulation and metered release
//!
//! Per-record state machine, evaluated once per scheduler visit:
//! - inactive + storage enabled: bank one unit per accumulation interval,
//!   capped at `max_storage`; the accumulation clock is `last_emit_ms`
//!   (shared with the emission clock - a record runs exactly one of the two
//!   modes per cycle, so they never race on it)
//! - active: drain up to `release_amount` units per release interval, also
//!   bounded by the stored count and the nearby-population headroom
//!
//! Both methods operate on a record *clone*; the caller applies the mutated
//! fields back through the registry afterwards.

use crate::world::WorldProvider;
use spawnworks_core::{compute_target, EngineConfig, SpawnRng, SpawnerRecord};

/// Storage timing and metering rules
///
/// Intervals come from the global engine config, not from per-category
/// config: one policy for the whole registry.
#[derive(Debug, Clone, Copy)]
pub struct StorageSystem {
    accumulation_interval_ms: u64,
    release_interval_ms: u64,
    release_amount: u32,
}

impl StorageSystem {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            accumulation_interval_ms: config.accumulation_interval_ms(),
            release_interval_ms: config.release_interval_ms(),
            release_amount: config.storage_release_amount.max(1),
        }
    }

    /// Accumulate-only mode: bank a unit when the interval has elapsed
    ///
    /// Returns true when a unit was actually banked. The clock advances
    /// whenever the interval is due, even at capacity, so a full pool does
    /// not cause an instant bank on the next toggle.
    pub fn accumulate(&self, record: &mut SpawnerRecord, now_ms: u64) -> bool {
        if record.active || !record.storage_enabled {
            return false;
        }
        if now_ms.saturating_sub(record.last_emit_ms) < self.accumulation_interval_ms {
            return false;
        }
        let banked = record.stored_count < record.params.max_storage;
        record.add_stored(1);
        record.last_emit_ms = now_ms;
        banked
    }

    /// Metered release back into the world; returns units actually placed
    ///
    /// `releasable = min(release_amount, stored, max_nearby - nearby)`.
    /// A zero headroom defers without touching the clock (capacity is not an
    /// error); a due release with headroom stamps the clock even when every
    /// placement was rejected, preventing tight retry loops over a saturated
    /// area.
    pub fn release(
        &self,
        record: &mut SpawnerRecord,
        now_ms: u64,
        world: &dyn WorldProvider,
        rng: &mut SpawnRng,
    ) -> u32 {
        if !record.active || !record.storage_enabled || record.stored_count == 0 {
            return 0;
        }
        if now_ms.saturating_sub(record.last_release_ms) < self.release_interval_ms {
            return 0;
        }

        let nearby = world.nearby_count_of(
            &record.position,
            record.params.activation_range,
            &record.product,
        );
        let headroom = record.params.max_nearby.saturating_sub(nearby);
        let releasable = self
            .release_amount
            .min(record.stored_count)
            .min(headroom);
        if releasable == 0 {
            return 0;
        }

        let mut placed = 0;
        for _ in 0..releasable {
            let target = compute_target(record, rng);
            if world.is_location_acceptable(&target, &record.product)
                && world.materialize(&target, &record.product)
            {
                record.remove_stored(1);
                record.released_total += 1;
                placed += 1;
            }
        }
        record.last_release_ms = now_ms;
        placed
    }
}
