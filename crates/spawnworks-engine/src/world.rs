//! World collaborator trait
//!
//! The world is the host environment that actually materializes and counts
//! game entities. It is not safe for concurrent mutation, so all calls into
//! it happen from the single scheduler driver, and the registry lock is
//! never held across them.

use spawnworks_core::{BlockPos, ProductId, SpawnTarget, WorldId};

/// Interface the engine consumes; implemented by surrounding code
pub trait WorldProvider: Send + Sync {
    /// Whether a world is currently loaded and queryable
    fn is_world_loaded(&self, world: &WorldId) -> bool;

    /// Whether the spawner's underlying block still exists
    fn block_exists(&self, pos: &BlockPos) -> bool;

    /// Count of same-product entities within the cubic range around `pos`
    fn nearby_count_of(&self, pos: &BlockPos, range: u32, product: &ProductId) -> u32;

    /// Whether a location is acceptable for this product (support, fluids,
    /// per-product legality - entirely the host's business)
    fn is_location_acceptable(&self, target: &SpawnTarget, product: &ProductId) -> bool;

    /// Materialize one unit; false means the world rejected it this cycle
    fn materialize(&self, target: &SpawnTarget, product: &ProductId) -> bool;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Scriptable world for scheduler and service tests
    pub struct MockWorld {
        pub loaded: Mutex<HashSet<WorldId>>,
        /// Blocks reported missing by `block_exists`
        pub missing_blocks: Mutex<HashSet<BlockPos>>,
        /// Nearby counts per position; absent means 0
        pub nearby: Mutex<HashMap<BlockPos, u32>>,
        /// When false, every location is rejected
        pub accept_locations: Mutex<bool>,
        /// When false, every materialize call fails
        pub accept_materialize: Mutex<bool>,
        /// Log of every successful materialization
        pub materialized: Mutex<Vec<(SpawnTarget, ProductId)>>,
    }

    impl MockWorld {
        pub fn new() -> Self {
            let mut loaded = HashSet::new();
            loaded.insert(WorldId::new("overworld"));
            Self {
                loaded: Mutex::new(loaded),
                missing_blocks: Mutex::new(HashSet::new()),
                nearby: Mutex::new(HashMap::new()),
                accept_locations: Mutex::new(true),
                accept_materialize: Mutex::new(true),
                materialized: Mutex::new(Vec::new()),
            }
        }

        pub fn set_nearby(&self, pos: &BlockPos, count: u32) {
            self.nearby.lock().unwrap().insert(pos.clone(), count);
        }

        pub fn materialized_count(&self) -> usize {
            self.materialized.lock().unwrap().len()
        }
    }

    impl WorldProvider for MockWorld {
        fn is_world_loaded(&self, world: &WorldId) -> bool {
            self.loaded.lock().unwrap().contains(world)
        }

        fn block_exists(&self, pos: &BlockPos) -> bool {
            !self.missing_blocks.lock().unwrap().contains(pos)
        }

        fn nearby_count_of(&self, pos: &BlockPos, _range: u32, _product: &ProductId) -> u32 {
            self.nearby.lock().unwrap().get(pos).copied().unwrap_or(0)
        }

        fn is_location_acceptable(&self, _target: &SpawnTarget, _product: &ProductId) -> bool {
            *self.accept_locations.lock().unwrap()
        }

        fn materialize(&self, target: &SpawnTarget, product: &ProductId) -> bool {
            if !*self.accept_materialize.lock().unwrap() {
                return false;
            }
            self.materialized
                .lock()
                .unwrap()
                .push((target.clone(), product.clone()));
            true
        }
    }
}
