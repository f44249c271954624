//! Persistence collaborator trait
//!
//! Saves are fire-and-forget: implementations queue the work on their own
//! bounded worker pool and surface failures as logged warnings. Nothing here
//! may block the tick path; in-memory state stays authoritative whether or
//! not a save lands.
//!
//! Loading happens once at startup (and on the deferred-record retry timer),
//! so it is not part of this trait - the application wires loaded records
//! into `SpawnerService::bootstrap` directly.

use spawnworks_core::{PlayerLimitData, SpawnerRecord};

/// Asynchronous persistence sink
pub trait Persistence: Send + Sync {
    fn save_record(&self, record: &SpawnerRecord);

    fn delete_record(&self, id: u64);

    fn save_player(&self, data: &PlayerLimitData);
}

/// Discards everything; for tests and ephemeral setups
pub struct NoPersistence;

impl Persistence for NoPersistence {
    fn save_record(&self, _record: &SpawnerRecord) {}

    fn delete_record(&self, _id: u64) {}

    fn save_player(&self, _data: &PlayerLimitData) {}
}
