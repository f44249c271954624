//! Spawnworks Engine - registry, scheduler and the service facade
//!
//! This crate owns everything stateful and concurrent:
//! - `SpawnerRegistry` - the keyed store of spawner records with a resumable
//!   round-robin batch cursor
//! - `TickScheduler` - the periodic driver, budgeted per cycle
//! - the storage accumulation/release state machine
//! - `SpawnerService` - the context object exposing every public operation,
//!   constructed at startup and passed by handle (no process-wide state)
//!
//! External collaborators enter through traits: `WorldProvider` (entity
//! counts, legality checks, materialization), `EconomyProvider` (funds) and
//! `Persistence` (asynchronous saves). The scheduler never holds a registry
//! lock across a call into any of them.

mod config;
mod deferred;
mod economy;
mod error;
mod persistence;
mod registry;
mod scheduler;
mod service;
mod storage;
mod world;

pub use config::ServiceConfig;
pub use deferred::DeferredRecords;
pub use economy::{EconomyError, EconomyProvider, NoEconomy};
pub use error::{Error, Result};
pub use persistence::{NoPersistence, Persistence};
pub use registry::SpawnerRegistry;
pub use scheduler::{TickReport, TickScheduler};
pub use service::{RejectReason, SpawnerService, UpgradeOutcome};
pub use storage::StorageSystem;
pub use world::WorldProvider;
