//! Placement strategy - where an emitted unit goes
//!
//! Two modes:
//! - Precise: spawner position plus the configured offset, re-clamped to the
//!   activation range on every computation (not only on assignment), so a
//!   later range reduction keeps output inside range.
//! - Random: uniform draw in `[-range, +range]` per axis.
//!
//! The core does no legality checks beyond the clamp; "is this location
//! acceptable for this product" is the world collaborator's call.

use crate::position::WorldId;
use crate::rng::SpawnRng;
use crate::spawner::{PlacementMode, SpawnerRecord};
use serde::{Deserialize, Serialize};

/// A continuous emission target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTarget {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Compute the emission target for one unit
pub fn compute_target(record: &SpawnerRecord, rng: &mut SpawnRng) -> SpawnTarget {
    let base_x = f64::from(record.position.x);
    let base_y = f64::from(record.position.y);
    let base_z = f64::from(record.position.z);
    let range = record.params.activation_range;

    let (x, y, z) = match record.placement_mode {
        PlacementMode::Precise => {
            let off = record.precise_offset.clamped(range);
            (base_x + off.dx, base_y + off.dy, base_z + off.dz)
        }
        PlacementMode::Random => {
            let r = f64::from(range);
            (
                base_x + rng.range_f64(-r, r),
                base_y + rng.range_f64(-r, r),
                base_z + rng.range_f64(-r, r),
            )
        }
    };

    SpawnTarget {
        world: record.position.world.clone(),
        x,
        y,
        z,
    }
}
