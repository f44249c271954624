//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::*;
use spawnworks_core::{PlayerLimitData, SpawnerRecord};
use std::path::Path;
use std::sync::LazyLock;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredSpawner>().unwrap();
    models.define::<StoredPlayer>().unwrap();
    models
});

/// Database store for persistent spawner state.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Save a spawner record.
    pub fn save_spawner(&self, record: &SpawnerRecord) -> Result<()> {
        let stored = StoredSpawner::from_record(record);
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Load a spawner record by ID.
    pub fn load_spawner(&self, id: u64) -> Result<Option<SpawnerRecord>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredSpawner> = r.get().primary(id)?;
        Ok(stored.map(|s| s.to_record()))
    }

    /// Delete a spawner record.
    pub fn delete_spawner(&self, id: u64) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredSpawner> = rw.get().primary(id)?;
        if let Some(s) = stored {
            rw.remove(s)?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Load all spawner records.
    pub fn load_all_spawners(&self) -> Result<Vec<SpawnerRecord>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredSpawner>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredSpawner>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        Ok(stored.into_iter().map(|s| s.to_record()).collect())
    }

    /// Load all spawner records for one owner.
    pub fn spawners_by_owner(&self, owner: &str) -> Result<Vec<SpawnerRecord>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredSpawner>(StoredSpawnerKey::owner)?;
        let iter = scan.start_with(owner)?;
        let stored: std::result::Result<Vec<StoredSpawner>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        Ok(stored.into_iter().map(|s| s.to_record()).collect())
    }

    /// Save per-player limit data.
    pub fn save_player(&self, data: &PlayerLimitData) -> Result<()> {
        let stored = StoredPlayer::from_data(data);
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Load per-player limit data.
    pub fn load_player(&self, owner: &str) -> Result<Option<PlayerLimitData>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredPlayer> = r.get().primary(owner.to_string())?;
        Ok(stored.map(|s| s.to_data()))
    }

    /// Load all per-player limit data.
    pub fn load_all_players(&self) -> Result<Vec<PlayerLimitData>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredPlayer>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredPlayer>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        Ok(stored.into_iter().map(|s| s.to_data()).collect())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spawnworks_core::{
        BlockPos, OwnerId, ProductId, SpawnerCategory, SpawnerRecord, WorldId,
    };

    fn record(id: u64, owner: &str, x: i32) -> SpawnerRecord {
        let mut rec = SpawnerRecord::new(
            OwnerId::new(owner),
            SpawnerCategory::Standard,
            ProductId::new("zombie"),
            BlockPos::new(WorldId::new("overworld"), x, 64, 0),
            0,
        );
        rec.id = id;
        rec
    }

    #[test]
    fn save_load_delete_spawner() {
        let store = Store::in_memory().unwrap();
        store.save_spawner(&record(1, "owner-1", 0)).unwrap();

        let loaded = store.load_spawner(1).unwrap().unwrap();
        assert_eq!(loaded.id, 1);
        assert_eq!(loaded.position.x, 0);

        store.delete_spawner(1).unwrap();
        assert!(store.load_spawner(1).unwrap().is_none());
        // Deleting again is a no-op.
        store.delete_spawner(1).unwrap();
    }

    #[test]
    fn upsert_overwrites_the_existing_row() {
        let store = Store::in_memory().unwrap();
        let mut rec = record(1, "owner-1", 0);
        store.save_spawner(&rec).unwrap();
        rec.stored_count = 4;
        store.save_spawner(&rec).unwrap();

        assert_eq!(store.load_all_spawners().unwrap().len(), 1);
        assert_eq!(store.load_spawner(1).unwrap().unwrap().stored_count, 4);
    }

    #[test]
    fn owner_index_filters_records() {
        let store = Store::in_memory().unwrap();
        store.save_spawner(&record(1, "owner-1", 0)).unwrap();
        store.save_spawner(&record(2, "owner-1", 1)).unwrap();
        store.save_spawner(&record(3, "owner-2", 2)).unwrap();

        assert_eq!(store.spawners_by_owner("owner-1").unwrap().len(), 2);
        assert_eq!(store.spawners_by_owner("owner-2").unwrap().len(), 1);
        assert!(store.spawners_by_owner("owner-3").unwrap().is_empty());
    }

    #[test]
    fn player_data_round_trips() {
        let store = Store::in_memory().unwrap();
        let mut data = PlayerLimitData::new(OwnerId::new("owner-1"));
        data.add_purchased_limit(SpawnerCategory::Premium, 2);
        data.unlock(SpawnerCategory::Standard, ProductId::new("creeper"));
        store.save_player(&data).unwrap();

        let loaded = store.load_player("owner-1").unwrap().unwrap();
        assert_eq!(loaded, data);
        assert!(store.load_player("owner-9").unwrap().is_none());
        assert_eq!(store.load_all_players().unwrap().len(), 1);
    }
}
