//! Service configuration bundle

use serde::{Deserialize, Serialize};
use spawnworks_core::{CategoryConfig, EngineConfig, SpawnerCategory, UpgradeSet, UpgradeTables};

/// Everything the service needs to operate, bundled at startup
///
/// Built by hand in tests or loaded from RON files by `spawnworks-config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub engine: EngineConfig,
    pub standard: CategoryConfig,
    pub premium: CategoryConfig,
    pub upgrades: UpgradeTables,
}

impl ServiceConfig {
    /// Sanitize all timing fields once, at construction time
    pub fn sanitized(mut self) -> Self {
        self.engine = self.engine.sanitized();
        self
    }

    pub fn category(&self, category: SpawnerCategory) -> &CategoryConfig {
        match category {
            SpawnerCategory::Standard => &self.standard,
            SpawnerCategory::Premium => &self.premium,
        }
    }

    pub fn upgrades_for(&self, category: SpawnerCategory) -> &UpgradeSet {
        self.upgrades.for_category(category)
    }
}
