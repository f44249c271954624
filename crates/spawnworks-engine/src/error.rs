//! Error types for spawnworks-engine

use spawnworks_core::{BlockPos, ProductId, WorldId};
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spawnworks-engine
#[derive(Debug, Error)]
pub enum Error {
    /// No spawner record at the given position
    #[error("no spawner at {0}")]
    NotFound(BlockPos),

    /// A live record already occupies the key
    #[error("a spawner already exists at {0}")]
    PositionOccupied(BlockPos),

    /// Owner reached the placement limit for the category
    #[error("spawner limit reached ({current}/{limit})")]
    LimitReached { current: usize, limit: u32 },

    /// Product is neither default-available nor unlocked for the owner
    #[error("product '{0}' is not unlocked")]
    ProductLocked(ProductId),

    /// Referenced world is not loaded; the record is parked for retry
    #[error("world '{0}' is not loaded")]
    WorldUnavailable(WorldId),

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] spawnworks_core::Error),
}

// Compile-time check that Error is Send + Sync for thread-safe propagation.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
