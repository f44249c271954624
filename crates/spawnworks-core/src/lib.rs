//! Spawnworks Core - Data model and pure logic for the spawner engine
//!
//! This crate provides the types and pure computations shared by the rest of
//! the workspace:
//! - Normalized block positions and identity newtypes
//! - The mutable `SpawnerRecord` owned by the registry
//! - Upgrade paths, the closed `UpgradeKind` enum, and the effective-parameter
//!   resolver (always recomputed from base values)
//! - Placement target computation (random-in-range / precise-with-clamp)
//! - Player limit data and purchase cost quotes
//! - Deterministic RNG for placement rolls
//!
//! Nothing in this crate performs I/O, logging, or locking. Concurrency and
//! side effects live in `spawnworks-engine`.

mod config;
mod error;
mod placement;
mod player;
mod position;
mod resolver;
mod rng;
mod spawner;
mod upgrade;

pub use config::{CategoryConfig, EngineConfig, PriceMode, PricingConfig, MS_PER_TICK};
pub use error::{Error, Result};
pub use placement::{compute_target, SpawnTarget};
pub use player::{purchase_quote, PlayerLimitData};
pub use position::{BlockPos, WorldId};
pub use resolver::{plan_advance, resolve_effective, AdvancePlan};
pub use rng::SpawnRng;
pub use spawner::{
    EffectiveParams, OwnerId, PlacementMode, PreciseOffset, ProductId, SpawnerCategory,
    SpawnerRecord,
};
pub use upgrade::{CombineRule, UpgradeKind, UpgradeLevel, UpgradePath, UpgradeSet, UpgradeTables};
