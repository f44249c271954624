//! Spawnworks DB - persistence layer using native_db
//!
//! Provides durable storage for:
//! - Spawner records (position, upgrades, storage pool, clocks)
//! - Per-player limit and unlock data
//!
//! The synchronous [`Store`] is used at startup and shutdown; during
//! operation the engine writes through the bounded [`SaveWorker`], which
//! implements `spawnworks_engine::Persistence` and keeps database latency
//! out of the tick path.

mod error;
mod models;
mod store;
mod worker;

pub use error::{Error, Result};
pub use models::{StoredPlayer, StoredSpawner};
pub use store::Store;
pub use worker::{SaveWorker, SaveWorkerConfig};
