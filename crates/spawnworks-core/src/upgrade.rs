//! Upgrade paths and kinds
//!
//! Upgrades are keyed by a config-defined string, but every path carries a
//! closed [`UpgradeKind`] deciding which operating parameter it affects and
//! how the level value combines with the base value. This replaces
//! string-matched dispatch, where a typo in a key silently did nothing.

use crate::spawner::SpawnerCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which effective parameter an upgrade path modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Ticks between emissions; lower is faster
    EmitDelay,
    /// Placements per due emission
    EmitCount,
    /// Population cap within the activation range
    MaxNearby,
    /// Cubic half-extent for placement and counting
    ActivationRange,
    /// Storage pool capacity
    MaxStorage,
}

/// How a level's value combines with the base config value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineRule {
    /// The reached level's value is used verbatim (last-level wins)
    Override,
    /// `base + level × per-level increment`
    AddPerLevel,
}

impl UpgradeKind {
    /// The combination rule for this kind
    ///
    /// Delay is a rate: each level states the full new delay. The capacity
    /// style parameters grow linearly with the level.
    pub fn combine_rule(&self) -> CombineRule {
        match self {
            UpgradeKind::EmitDelay => CombineRule::Override,
            UpgradeKind::EmitCount
            | UpgradeKind::MaxNearby
            | UpgradeKind::ActivationRange
            | UpgradeKind::MaxStorage => CombineRule::AddPerLevel,
        }
    }
}

/// One level in an upgrade path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLevel {
    /// Cost of advancing *to* this level
    pub cost: f64,
    /// Value applied at this level, interpreted per the path's combine rule
    pub value: f64,
    /// Prerequisites: other upgrade key → minimum level, gating this level
    #[serde(default)]
    pub requires: HashMap<String, u32>,
}

/// An ordered table of levels for one upgrade key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradePath {
    /// Stable key used in records' level maps
    pub key: String,
    pub kind: UpgradeKind,
    /// Display metadata for menus; unused by the core
    pub display_name: String,
    /// Level table; level n (1-based) is `levels[n - 1]`
    pub levels: Vec<UpgradeLevel>,
}

impl UpgradePath {
    pub fn new(key: impl Into<String>, kind: UpgradeKind, levels: Vec<UpgradeLevel>) -> Self {
        let key = key.into();
        Self {
            display_name: key.clone(),
            key,
            kind,
            levels,
        }
    }

    /// Maximum attainable level (size of the level table)
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Value table entry for a 1-based level
    pub fn level_value(&self, level: u32) -> Option<f64> {
        if level == 0 {
            return None;
        }
        self.levels.get(level as usize - 1).map(|l| l.value)
    }

    /// The per-level increment for `AddPerLevel` paths is level 1's value
    pub fn per_level_increment(&self) -> f64 {
        self.level_value(1).unwrap_or(0.0)
    }

    /// Prerequisites attached to a 1-based target level
    pub fn requirements_for(&self, level: u32) -> Option<&HashMap<String, u32>> {
        if level == 0 {
            return None;
        }
        self.levels.get(level as usize - 1).map(|l| &l.requires)
    }

    /// Cost of advancing from `current` to `current + 1`, if such a level exists
    pub fn cost_to_advance(&self, current: u32) -> Option<f64> {
        self.levels.get(current as usize).map(|l| l.cost)
    }
}

/// All upgrade paths for one category, in config order
pub type UpgradeSet = IndexMap<String, UpgradePath>;

/// Upgrade tables for both categories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeTables {
    pub standard: UpgradeSet,
    pub premium: UpgradeSet,
}

impl UpgradeTables {
    pub fn for_category(&self, category: SpawnerCategory) -> &UpgradeSet {
        match category {
            SpawnerCategory::Standard => &self.standard,
            SpawnerCategory::Premium => &self.premium,
        }
    }
}
