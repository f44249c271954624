//! Database models for persistent storage.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use spawnworks_core::{
    BlockPos, OwnerId, PlacementMode, PlayerLimitData, PreciseOffset, ProductId, SpawnerCategory,
    SpawnerRecord, WorldId,
};

/// Stored spawner record in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredSpawner {
    /// Primary key - record ID.
    #[primary_key]
    pub id: u64,
    /// Canonical position key ("world:x:y:z").
    #[secondary_key(unique)]
    pub position_key: String,
    /// Owner, for per-player queries.
    #[secondary_key]
    pub owner: String,
    pub category: String,
    pub product: String,
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Serialized upgrade level map. Effective parameters are not stored;
    /// they are re-resolved from config at load.
    pub upgrade_levels: Vec<u8>,
    pub storage_enabled: bool,
    pub stored_count: u32,
    pub released_total: u64,
    pub active: bool,
    /// "random" or "precise".
    pub placement_mode: String,
    pub offset_dx: f64,
    pub offset_dy: f64,
    pub offset_dz: f64,
    pub last_emit_ms: u64,
    pub last_release_ms: u64,
}

impl StoredSpawner {
    /// Create from an engine record.
    pub fn from_record(record: &SpawnerRecord) -> Self {
        let upgrade_levels = bincode::serialize(&record.upgrade_levels).unwrap_or_default();
        Self {
            id: record.id,
            position_key: record.position.key(),
            owner: record.owner.as_str().to_string(),
            category: record.category.as_str().to_string(),
            product: record.product.as_str().to_string(),
            world: record.position.world.as_str().to_string(),
            x: record.position.x,
            y: record.position.y,
            z: record.position.z,
            upgrade_levels,
            storage_enabled: record.storage_enabled,
            stored_count: record.stored_count,
            released_total: record.released_total,
            active: record.active,
            placement_mode: match record.placement_mode {
                PlacementMode::Random => "random".to_string(),
                PlacementMode::Precise => "precise".to_string(),
            },
            offset_dx: record.precise_offset.dx,
            offset_dy: record.precise_offset.dy,
            offset_dz: record.precise_offset.dz,
            last_emit_ms: record.last_emit_ms,
            last_release_ms: record.last_release_ms,
        }
    }

    /// Convert to an engine record.
    ///
    /// Effective parameters come back as defaults; the service re-resolves
    /// them from the category base config during bootstrap.
    pub fn to_record(&self) -> SpawnerRecord {
        let position = BlockPos::new(WorldId::new(self.world.clone()), self.x, self.y, self.z);
        let category = match self.category.as_str() {
            "premium" => SpawnerCategory::Premium,
            _ => SpawnerCategory::Standard,
        };
        let mut record = SpawnerRecord::new(
            OwnerId::new(self.owner.clone()),
            category,
            ProductId::new(self.product.clone()),
            position,
            0,
        );
        record.id = self.id;
        record.upgrade_levels = bincode::deserialize(&self.upgrade_levels).unwrap_or_default();
        record.storage_enabled = self.storage_enabled;
        record.stored_count = self.stored_count;
        record.released_total = self.released_total;
        record.active = self.active;
        record.placement_mode = match self.placement_mode.as_str() {
            "precise" => PlacementMode::Precise,
            _ => PlacementMode::Random,
        };
        record.precise_offset = PreciseOffset::new(self.offset_dx, self.offset_dy, self.offset_dz);
        record.last_emit_ms = self.last_emit_ms;
        record.last_release_ms = self.last_release_ms;
        record
    }
}

/// Stored per-player limit data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredPlayer {
    /// Primary key - owner ID.
    #[primary_key]
    pub owner: String,
    /// Serialized limit and unlock data.
    pub data: Vec<u8>,
}

impl StoredPlayer {
    /// Create from player limit data.
    pub fn from_data(data: &PlayerLimitData) -> Self {
        Self {
            owner: data.owner.as_str().to_string(),
            data: bincode::serialize(data).unwrap_or_default(),
        }
    }

    /// Convert to player limit data.
    pub fn to_data(&self) -> PlayerLimitData {
        bincode::deserialize(&self.data)
            .unwrap_or_else(|_| PlayerLimitData::new(OwnerId::new(self.owner.clone())))
    }
}
