//! RON configuration loader
//!
//! Assembles a complete [`ServiceConfig`] from per-concern RON files:
//! engine timing, one base-parameter file per category, one upgrade table
//! per category. Missing files fall back to defaults with a warning;
//! malformed files are errors, since silently ignoring a file the operator
//! wrote is worse than refusing to start.

use crate::error::{Error, Result};
use crate::schema::{CategoryFile, EngineFile, UpgradeFile};
use spawnworks_core::{CombineRule, SpawnerCategory, UpgradeSet};
use spawnworks_engine::ServiceConfig;
use std::fs;
use std::path::Path;

/// Well-known file names under the config directory
const ENGINE_FILE: &str = "engine.ron";
const STANDARD_FILE: &str = "standard.ron";
const PREMIUM_FILE: &str = "premium.ron";
const STANDARD_UPGRADES_FILE: &str = "upgrades_standard.ron";
const PREMIUM_UPGRADES_FILE: &str = "upgrades_premium.ron";

/// Loader assembling a service configuration from RON sources
pub struct Loader {
    config: ServiceConfig,
}

/// Parse RON with `implicit_some` enabled, so sparse files can write
/// `field: value` instead of `field: Some(value)`.
fn from_ron_str<T: serde::de::DeserializeOwned>(
    content: &str,
) -> ron::error::SpannedResult<T> {
    ron::Options::default()
        .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
        .from_str(content)
}

impl Loader {
    /// Start from defaults
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Load every well-known file under a directory
    ///
    /// Absent files keep their defaults; present files must parse.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {dir:?}"),
            )));
        }

        self.load_optional(dir.join(ENGINE_FILE), Self::load_engine_str)?;
        self.load_optional(dir.join(STANDARD_FILE), |l, s| {
            l.load_category_str(SpawnerCategory::Standard, s)
        })?;
        self.load_optional(dir.join(PREMIUM_FILE), |l, s| {
            l.load_category_str(SpawnerCategory::Premium, s)
        })?;
        self.load_optional(dir.join(STANDARD_UPGRADES_FILE), |l, s| {
            l.load_upgrades_str(SpawnerCategory::Standard, s)
        })?;
        self.load_optional(dir.join(PREMIUM_UPGRADES_FILE), |l, s| {
            l.load_upgrades_str(SpawnerCategory::Premium, s)
        })?;
        Ok(())
    }

    /// Load engine timing from a RON string
    pub fn load_engine_str(&mut self, content: &str) -> Result<()> {
        let file: EngineFile = from_ron_str(content)?;
        self.config.engine = file.into_config();
        Ok(())
    }

    /// Load one category's base parameters from a RON string
    pub fn load_category_str(
        &mut self,
        category: SpawnerCategory,
        content: &str,
    ) -> Result<()> {
        let file: CategoryFile = from_ron_str(content)?;
        let cfg = file.into_config();
        match category {
            SpawnerCategory::Standard => self.config.standard = cfg,
            SpawnerCategory::Premium => self.config.premium = cfg,
        }
        Ok(())
    }

    /// Load one category's upgrade table from a RON string
    pub fn load_upgrades_str(
        &mut self,
        category: SpawnerCategory,
        content: &str,
    ) -> Result<()> {
        let file: UpgradeFile = from_ron_str(content)?;
        let mut set = UpgradeSet::new();
        for entry in file.upgrades {
            let path = entry.into_path();
            if path.levels.is_empty() {
                log::warn!("upgrade '{}' has no levels, skipping", path.key);
                continue;
            }
            if path.kind.combine_rule() == CombineRule::Override
                && path.levels.iter().any(|l| l.value <= 0.0)
            {
                return Err(Error::Invalid(format!(
                    "upgrade '{}' has a non-positive override value",
                    path.key
                )));
            }
            if set.contains_key(&path.key) {
                return Err(Error::DuplicateUpgrade(path.key));
            }
            set.insert(path.key.clone(), path);
        }
        match category {
            SpawnerCategory::Standard => self.config.upgrades.standard = set,
            SpawnerCategory::Premium => self.config.upgrades.premium = set,
        }
        Ok(())
    }

    /// Finish loading and return the assembled configuration
    pub fn finish(self) -> ServiceConfig {
        self.config.sanitized()
    }

    fn load_optional(
        &mut self,
        path: std::path::PathBuf,
        load: impl FnOnce(&mut Self, &str) -> Result<()>,
    ) -> Result<()> {
        match fs::read_to_string(&path) {
            Ok(content) => load(self, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("config file {path:?} not found, using defaults");
                Ok(())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
