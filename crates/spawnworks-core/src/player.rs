//! Player limit data and purchase pricing

use crate::config::{PriceMode, PricingConfig};
use crate::spawner::{OwnerId, ProductId, SpawnerCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-owner purchased limits and unlocked products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLimitData {
    pub owner: OwnerId,
    standard_purchased: u32,
    premium_purchased: u32,
    standard_unlocked: BTreeSet<ProductId>,
    premium_unlocked: BTreeSet<ProductId>,
}

impl PlayerLimitData {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            standard_purchased: 0,
            premium_purchased: 0,
            standard_unlocked: BTreeSet::new(),
            premium_unlocked: BTreeSet::new(),
        }
    }

    /// Purchased limit increase for a category
    pub fn purchased_limit(&self, category: SpawnerCategory) -> u32 {
        match category {
            SpawnerCategory::Standard => self.standard_purchased,
            SpawnerCategory::Premium => self.premium_purchased,
        }
    }

    pub fn set_purchased_limit(&mut self, category: SpawnerCategory, limit: u32) {
        match category {
            SpawnerCategory::Standard => self.standard_purchased = limit,
            SpawnerCategory::Premium => self.premium_purchased = limit,
        }
    }

    pub fn add_purchased_limit(&mut self, category: SpawnerCategory, amount: u32) {
        match category {
            SpawnerCategory::Standard => {
                self.standard_purchased = self.standard_purchased.saturating_add(amount)
            }
            SpawnerCategory::Premium => {
                self.premium_purchased = self.premium_purchased.saturating_add(amount)
            }
        }
    }

    pub fn has_unlocked(&self, category: SpawnerCategory, product: &ProductId) -> bool {
        self.unlocked(category).contains(product)
    }

    pub fn unlock(&mut self, category: SpawnerCategory, product: ProductId) {
        self.unlocked_mut(category).insert(product);
    }

    pub fn lock(&mut self, category: SpawnerCategory, product: &ProductId) {
        self.unlocked_mut(category).remove(product);
    }

    pub fn unlocked(&self, category: SpawnerCategory) -> &BTreeSet<ProductId> {
        match category {
            SpawnerCategory::Standard => &self.standard_unlocked,
            SpawnerCategory::Premium => &self.premium_unlocked,
        }
    }

    fn unlocked_mut(&mut self, category: SpawnerCategory) -> &mut BTreeSet<ProductId> {
        match category {
            SpawnerCategory::Standard => &mut self.standard_unlocked,
            SpawnerCategory::Premium => &mut self.premium_unlocked,
        }
    }
}

/// Quote the cost of buying `amount` limit increases
///
/// Fixed mode: `base_price × amount`. Multiplier mode: unit i (0-based,
/// counting from the units already purchased) costs
/// `base_price × multiplier^(purchased + i)`.
pub fn purchase_quote(pricing: &PricingConfig, already_purchased: u32, amount: u32) -> f64 {
    match pricing.mode {
        PriceMode::Fixed => pricing.base_price * f64::from(amount),
        PriceMode::Multiplier => (0..amount)
            .map(|i| {
                pricing.base_price
                    * pricing
                        .multiplier
                        .powi((already_purchased + i) as i32)
            })
            .sum(),
    }
}
