//! Spawnworks Config - RON configuration loading
//!
//! Reads the engine's configuration from a directory of RON files:
//! - `engine.ron` - scheduler and storage timing
//! - `standard.ron` / `premium.ron` - per-category base parameters
//! - `upgrades_standard.ron` / `upgrades_premium.ron` - upgrade tables
//!
//! Absent files fall back to documented defaults with a warning; malformed
//! files refuse to load.

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::Loader;
pub use schema::{CategoryFile, EngineFile, PricingSection, UpgradeEntry, UpgradeFile};
