//! Base configuration types
//!
//! These are plain data: the config crate loads them from RON files, the
//! engine consumes them. Defaults here are the documented fallbacks used
//! when a file omits or mangles a value.

use crate::spawner::{EffectiveParams, ProductId};
use serde::{Deserialize, Serialize};

/// Milliseconds per logical tick
pub const MS_PER_TICK: u64 = 50;

/// How purchased placement-limit increases are priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    /// Every unit costs `base_price`
    Fixed,
    /// Unit i costs `base_price × multiplier^(already_purchased + i)`
    #[default]
    Multiplier,
}

/// Pricing for purchased placement-limit increases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub mode: PriceMode,
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_base_price() -> f64 {
    1000.0
}

fn default_multiplier() -> f64 {
    1.2
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            mode: PriceMode::default(),
            base_price: default_base_price(),
            multiplier: default_multiplier(),
        }
    }
}

/// Base parameters for one spawner category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Base ticks between emissions
    pub emit_delay_ticks: u32,
    /// Base placements per due emission
    pub emit_count: u32,
    /// Base population cap
    pub max_nearby: u32,
    /// Base cubic half-extent in blocks
    pub activation_range: u32,
    /// Whether storage accumulation is available at all
    pub storage_enabled: bool,
    /// Base storage pool capacity
    pub max_storage: u32,
    /// Placement limit before purchased increases
    pub base_limit: u32,
    /// Products available to every owner without an explicit unlock
    pub default_products: Vec<ProductId>,
    pub pricing: PricingConfig,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            emit_delay_ticks: 200,
            emit_count: 6,
            max_nearby: 5,
            activation_range: 8,
            storage_enabled: true,
            max_storage: 5,
            base_limit: 3,
            default_products: Vec::new(),
            pricing: PricingConfig::default(),
        }
    }
}

impl CategoryConfig {
    /// Base operating parameters, invariant-clamped
    pub fn base_params(&self) -> EffectiveParams {
        EffectiveParams {
            emit_delay_ticks: self.emit_delay_ticks,
            emit_count: self.emit_count,
            max_nearby: self.max_nearby,
            activation_range: self.activation_range,
            max_storage: self.max_storage,
        }
        .sanitized()
    }
}

/// Scheduler and storage timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ticks between scheduler firings
    pub tick_interval_ticks: u32,
    /// Work budget: records visited per firing
    pub max_per_cycle: usize,
    /// Ticks between stored-unit accumulations while inactive
    pub storage_accumulation_ticks: u32,
    /// Ticks between metered releases while active
    pub storage_release_ticks: u32,
    /// Units released per due release cycle
    pub storage_release_amount: u32,
    /// Floor applied to delay-override upgrades
    pub min_emit_delay_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ticks: 20,
            max_per_cycle: 10,
            storage_accumulation_ticks: 20,
            storage_release_ticks: 100,
            storage_release_amount: 1,
            min_emit_delay_ticks: 20,
        }
    }
}

impl EngineConfig {
    /// Clamp every field to a workable minimum
    pub fn sanitized(self) -> Self {
        Self {
            tick_interval_ticks: self.tick_interval_ticks.max(1),
            max_per_cycle: self.max_per_cycle.max(1),
            storage_accumulation_ticks: self.storage_accumulation_ticks.max(1),
            storage_release_ticks: self.storage_release_ticks.max(1),
            storage_release_amount: self.storage_release_amount.max(1),
            min_emit_delay_ticks: self.min_emit_delay_ticks.max(1),
        }
    }

    pub fn accumulation_interval_ms(&self) -> u64 {
        u64::from(self.storage_accumulation_ticks) * MS_PER_TICK
    }

    pub fn release_interval_ms(&self) -> u64 {
        u64::from(self.storage_release_ticks) * MS_PER_TICK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_params_are_invariant_clamped() {
        let cfg = CategoryConfig {
            emit_delay_ticks: 0,
            max_nearby: 0,
            ..CategoryConfig::default()
        };
        let params = cfg.base_params();
        assert_eq!(params.emit_delay_ticks, 1);
        assert_eq!(params.max_nearby, 1);
    }

    #[test]
    fn engine_config_sanitize_floors_at_one() {
        let cfg = EngineConfig {
            tick_interval_ticks: 0,
            max_per_cycle: 0,
            storage_release_amount: 0,
            ..EngineConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.tick_interval_ticks, 1);
        assert_eq!(cfg.max_per_cycle, 1);
        assert_eq!(cfg.storage_release_amount, 1);
    }

    #[test]
    fn interval_conversion_uses_tick_length() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.accumulation_interval_ms(), 20 * MS_PER_TICK);
        assert_eq!(cfg.release_interval_ms(), 100 * MS_PER_TICK);
    }
}
