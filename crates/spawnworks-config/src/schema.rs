//! Raw RON file schemas
//!
//! These structs mirror the on-disk file shapes, with serde defaults so a
//! sparse file is valid. Conversion into the engine's config types, with
//! validation and fallback, happens in the loader.

use serde::Deserialize;
use spawnworks_core::{
    CategoryConfig, EngineConfig, PriceMode, PricingConfig, ProductId, UpgradeKind, UpgradeLevel,
    UpgradePath,
};
use std::collections::HashMap;

/// Engine timing file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct EngineFile {
    pub tick_interval_ticks: Option<u32>,
    pub max_per_cycle: Option<usize>,
    pub storage_accumulation_ticks: Option<u32>,
    pub storage_release_ticks: Option<u32>,
    pub storage_release_amount: Option<u32>,
    pub min_emit_delay_ticks: Option<u32>,
}

impl EngineFile {
    pub fn into_config(self) -> EngineConfig {
        let d = EngineConfig::default();
        EngineConfig {
            tick_interval_ticks: self.tick_interval_ticks.unwrap_or(d.tick_interval_ticks),
            max_per_cycle: self.max_per_cycle.unwrap_or(d.max_per_cycle),
            storage_accumulation_ticks: self
                .storage_accumulation_ticks
                .unwrap_or(d.storage_accumulation_ticks),
            storage_release_ticks: self
                .storage_release_ticks
                .unwrap_or(d.storage_release_ticks),
            storage_release_amount: self
                .storage_release_amount
                .unwrap_or(d.storage_release_amount),
            min_emit_delay_ticks: self.min_emit_delay_ticks.unwrap_or(d.min_emit_delay_ticks),
        }
    }
}

/// Pricing section within a category file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PricingSection {
    pub mode: Option<String>,
    pub base_price: Option<f64>,
    pub multiplier: Option<f64>,
}

impl PricingSection {
    pub fn into_config(self) -> PricingConfig {
        let d = PricingConfig::default();
        let mode = match self.mode.as_deref() {
            Some("fixed") => PriceMode::Fixed,
            Some("multiplier") | None => PriceMode::Multiplier,
            Some(other) => {
                log::warn!("unknown price mode '{other}', using multiplier");
                PriceMode::Multiplier
            }
        };
        PricingConfig {
            mode,
            base_price: self.base_price.unwrap_or(d.base_price),
            multiplier: self.multiplier.unwrap_or(d.multiplier),
        }
    }
}

/// Per-category base parameter file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CategoryFile {
    pub emit_delay_ticks: Option<u32>,
    pub emit_count: Option<u32>,
    pub max_nearby: Option<u32>,
    pub activation_range: Option<u32>,
    pub storage_enabled: Option<bool>,
    pub max_storage: Option<u32>,
    pub base_limit: Option<u32>,
    pub default_products: Vec<String>,
    pub pricing: PricingSection,
}

impl CategoryFile {
    pub fn into_config(self) -> CategoryConfig {
        let d = CategoryConfig::default();
        CategoryConfig {
            emit_delay_ticks: self.emit_delay_ticks.unwrap_or(d.emit_delay_ticks),
            emit_count: self.emit_count.unwrap_or(d.emit_count),
            max_nearby: self.max_nearby.unwrap_or(d.max_nearby),
            activation_range: self.activation_range.unwrap_or(d.activation_range),
            storage_enabled: self.storage_enabled.unwrap_or(d.storage_enabled),
            max_storage: self.max_storage.unwrap_or(d.max_storage),
            base_limit: self.base_limit.unwrap_or(d.base_limit),
            default_products: self.default_products.into_iter().map(ProductId::new).collect(),
            pricing: self.pricing.into_config(),
        }
    }
}

/// One level entry inside an upgrade definition
#[derive(Debug, Deserialize)]
pub struct UpgradeLevelEntry {
    pub cost: f64,
    pub value: f64,
    #[serde(default)]
    pub requires: HashMap<String, u32>,
}

/// One upgrade path definition
#[derive(Debug, Deserialize)]
pub struct UpgradeEntry {
    pub key: String,
    pub kind: UpgradeKind,
    #[serde(default)]
    pub display_name: Option<String>,
    pub levels: Vec<UpgradeLevelEntry>,
}

impl UpgradeEntry {
    pub fn into_path(self) -> UpgradePath {
        let mut path = UpgradePath::new(
            self.key,
            self.kind,
            self.levels
                .into_iter()
                .map(|l| UpgradeLevel {
                    cost: l.cost,
                    value: l.value,
                    requires: l.requires,
                })
                .collect(),
        );
        if let Some(name) = self.display_name {
            path.display_name = name;
        }
        path
    }
}

/// Upgrade table file for one category
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpgradeFile {
    pub upgrades: Vec<UpgradeEntry>,
}
