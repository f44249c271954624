//! Spawner record - the persistent unit of scheduling state
//!
//! A `SpawnerRecord` is owned by the registry and mutated in place by the
//! scheduler (timestamps, stored count), the upgrade resolver (effective
//! parameters), and explicit owner actions (toggle, placement mode, product
//! switch).

use crate::position::BlockPos;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque tag for the kind of object a spawner emits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spawner tier, selecting which base config and upgrade tables apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpawnerCategory {
    #[default]
    Standard,
    Premium,
}

impl SpawnerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnerCategory::Standard => "standard",
            SpawnerCategory::Premium => "premium",
        }
    }
}

impl fmt::Display for SpawnerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How emission targets are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlacementMode {
    /// Uniform draw within the activation range on every axis
    #[default]
    Random,
    /// Fixed offset from the spawner position, clamped to the range
    Precise,
}

/// Offset used by precise placement mode
///
/// Stored as configured; the placement strategy re-clamps each component to
/// the current activation range on every computation, so a later range
/// reduction retroactively keeps output inside range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreciseOffset {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Default for PreciseOffset {
    fn default() -> Self {
        // One block above the spawner, the conventional starting point.
        Self {
            dx: 0.0,
            dy: 1.0,
            dz: 0.0,
        }
    }
}

impl PreciseOffset {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Clamp every component to `[-range, range]`
    pub fn clamped(&self, range: u32) -> Self {
        let r = f64::from(range);
        Self {
            dx: self.dx.clamp(-r, r),
            dy: self.dy.clamp(-r, r),
            dz: self.dz.clamp(-r, r),
        }
    }
}

/// Resolved (post-upgrade) operating parameters
///
/// These are derived values, cached on the record; the resolver recomputes
/// them from base config whenever upgrade levels change. Every field is
/// at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveParams {
    /// Ticks between emission attempts
    pub emit_delay_ticks: u32,
    /// Placements attempted per due emission
    pub emit_count: u32,
    /// Population cap for same-product entities within the range
    pub max_nearby: u32,
    /// Cubic half-extent for placement and nearby counting, in blocks
    pub activation_range: u32,
    /// Storage pool capacity
    pub max_storage: u32,
}

impl Default for EffectiveParams {
    fn default() -> Self {
        Self {
            emit_delay_ticks: 200,
            emit_count: 6,
            max_nearby: 5,
            activation_range: 8,
            max_storage: 5,
        }
    }
}

impl EffectiveParams {
    /// Force every field to its minimum legal value of 1
    pub fn sanitized(self) -> Self {
        Self {
            emit_delay_ticks: self.emit_delay_ticks.max(1),
            emit_count: self.emit_count.max(1),
            max_nearby: self.max_nearby.max(1),
            activation_range: self.activation_range.max(1),
            max_storage: self.max_storage.max(1),
        }
    }
}

/// One periodic emission point and its full scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerRecord {
    /// Stable identifier, 0 until first persisted
    pub id: u64,
    pub owner: OwnerId,
    pub category: SpawnerCategory,
    /// Kind of object emitted; switching it discards buffered output
    pub product: ProductId,
    /// Canonical registry key
    pub position: BlockPos,
    /// Raw upgrade levels by upgrade key
    pub upgrade_levels: HashMap<String, u32>,
    /// Cached effective operating parameters
    pub params: EffectiveParams,
    pub storage_enabled: bool,
    /// Buffered units, always within `0..=params.max_storage`
    pub stored_count: u32,
    /// Lifetime count of stored units actually released back into the world
    pub released_total: u64,
    /// true = normal emission mode, false = accumulate-only mode
    pub active: bool,
    pub placement_mode: PlacementMode,
    pub precise_offset: PreciseOffset,
    /// Emission clock while active, accumulation clock while inactive (ms)
    pub last_emit_ms: u64,
    /// Release clock (ms)
    pub last_release_ms: u64,
}

impl SpawnerRecord {
    /// Create a fresh record with default parameters
    ///
    /// Callers are expected to resolve effective parameters from the category
    /// base config right after creation.
    pub fn new(
        owner: OwnerId,
        category: SpawnerCategory,
        product: ProductId,
        position: BlockPos,
        now_ms: u64,
    ) -> Self {
        Self {
            id: 0,
            owner,
            category,
            product,
            position,
            upgrade_levels: HashMap::new(),
            params: EffectiveParams::default(),
            storage_enabled: true,
            stored_count: 0,
            released_total: 0,
            active: true,
            placement_mode: PlacementMode::default(),
            precise_offset: PreciseOffset::default(),
            last_emit_ms: now_ms,
            last_release_ms: now_ms,
        }
    }

    /// Current level for an upgrade key (0 when absent)
    pub fn upgrade_level(&self, key: &str) -> u32 {
        self.upgrade_levels.get(key).copied().unwrap_or(0)
    }

    /// Set an upgrade level; levels below zero cannot be represented
    pub fn set_upgrade_level(&mut self, key: impl Into<String>, level: u32) {
        self.upgrade_levels.insert(key.into(), level);
    }

    /// Add buffered units, capped at `max_storage`
    pub fn add_stored(&mut self, amount: u32) {
        self.stored_count = (self.stored_count + amount).min(self.params.max_storage);
    }

    /// Remove buffered units, floored at 0
    pub fn remove_stored(&mut self, amount: u32) {
        self.stored_count = self.stored_count.saturating_sub(amount);
    }

    /// Re-apply invariants after parameters changed
    ///
    /// Shrinking `max_storage` through a config reload must not leave the
    /// stored count above the new cap.
    pub fn clamp_to_params(&mut self) {
        self.params = self.params.sanitized();
        self.stored_count = self.stored_count.min(self.params.max_storage);
    }

    /// Switch the emitted product, discarding buffered output of the old one
    pub fn switch_product(&mut self, product: ProductId, now_ms: u64) {
        self.product = product;
        self.stored_count = 0;
        self.last_release_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::WorldId;

    fn record() -> SpawnerRecord {
        SpawnerRecord::new(
            OwnerId::new("owner-1"),
            SpawnerCategory::Standard,
            ProductId::new("zombie"),
            BlockPos::new(WorldId::new("overworld"), 0, 64, 0),
            1_000,
        )
    }

    #[test]
    fn stored_count_is_capped_and_floored() {
        let mut rec = record();
        rec.params.max_storage = 5;
        rec.add_stored(3);
        rec.add_stored(10);
        assert_eq!(rec.stored_count, 5);
        rec.remove_stored(2);
        assert_eq!(rec.stored_count, 3);
        rec.remove_stored(100);
        assert_eq!(rec.stored_count, 0);
    }

    #[test]
    fn product_switch_discards_storage_and_resets_release_clock() {
        let mut rec = record();
        rec.stored_count = 7;
        rec.params.max_storage = 10;
        rec.switch_product(ProductId::new("skeleton"), 5_000);
        assert_eq!(rec.stored_count, 0);
        assert_eq!(rec.last_release_ms, 5_000);
        assert_eq!(rec.product.as_str(), "skeleton");
    }

    #[test]
    fn sanitize_raises_zero_params_to_one() {
        let params = EffectiveParams {
            emit_delay_ticks: 0,
            emit_count: 0,
            max_nearby: 0,
            activation_range: 0,
            max_storage: 0,
        }
        .sanitized();
        assert_eq!(params.emit_delay_ticks, 1);
        assert_eq!(params.emit_count, 1);
        assert_eq!(params.max_nearby, 1);
        assert_eq!(params.activation_range, 1);
        assert_eq!(params.max_storage, 1);
    }

    #[test]
    fn shrinking_storage_cap_clamps_stored_count() {
        let mut rec = record();
        rec.params.max_storage = 10;
        rec.stored_count = 8;
        rec.params.max_storage = 4;
        rec.clamp_to_params();
        assert_eq!(rec.stored_count, 4);
    }

    #[test]
    fn precise_offset_clamps_componentwise() {
        let off = PreciseOffset::new(20.0, 0.5, -15.0).clamped(8);
        assert_eq!(off.dx, 8.0);
        assert_eq!(off.dy, 0.5);
        assert_eq!(off.dz, -8.0);
    }
}
