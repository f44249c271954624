//! Upgrade resolver - effective parameters from base config plus levels
//!
//! The resolver is a pure function. It always recomputes every derived
//! parameter from the category's *base* value, never from the previously
//! cached effective value, so repeated resolution with the same level map
//! yields identical results and nothing drifts.

use crate::error::{Error, Result};
use crate::spawner::EffectiveParams;
use crate::upgrade::{CombineRule, UpgradeKind, UpgradePath, UpgradeSet};
use std::collections::HashMap;

/// Compute effective operating parameters
///
/// Unknown keys in `levels` (paths removed from config) are skipped; levels
/// beyond a path's table fall back to the last defined level for `Override`
/// paths and use the configured increment for `AddPerLevel` paths.
pub fn resolve_effective(
    base: &EffectiveParams,
    upgrades: &UpgradeSet,
    levels: &HashMap<String, u32>,
    min_emit_delay_ticks: u32,
) -> EffectiveParams {
    let mut params = base.sanitized();

    for (key, &level) in levels {
        if level == 0 {
            continue;
        }
        let Some(path) = upgrades.get(key) else {
            continue;
        };
        let capped = level.min(path.max_level());
        if capped == 0 {
            continue;
        }
        match path.kind.combine_rule() {
            CombineRule::Override => {
                if let Some(value) = path.level_value(capped) {
                    apply_override(&mut params, path.kind, value, min_emit_delay_ticks);
                }
            }
            CombineRule::AddPerLevel => {
                let increment = path.per_level_increment();
                apply_additive(&mut params, path.kind, base, capped, increment);
            }
        }
    }

    params.sanitized()
}

fn apply_override(
    params: &mut EffectiveParams,
    kind: UpgradeKind,
    value: f64,
    min_emit_delay_ticks: u32,
) {
    if kind == UpgradeKind::EmitDelay {
        params.emit_delay_ticks = (value.max(0.0) as u32).max(min_emit_delay_ticks);
    }
}

fn apply_additive(
    params: &mut EffectiveParams,
    kind: UpgradeKind,
    base: &EffectiveParams,
    level: u32,
    increment: f64,
) {
    let bonus = (f64::from(level) * increment).max(0.0) as u32;
    match kind {
        UpgradeKind::EmitDelay => {}
        UpgradeKind::EmitCount => params.emit_count = base.emit_count.max(1) + bonus,
        UpgradeKind::MaxNearby => params.max_nearby = base.max_nearby.max(1) + bonus,
        UpgradeKind::ActivationRange => {
            params.activation_range = base.activation_range.max(1) + bonus
        }
        UpgradeKind::MaxStorage => params.max_storage = base.max_storage.max(1) + bonus,
    }
}

/// A permitted level advance: the level to write and what it costs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancePlan {
    pub next_level: u32,
    pub cost: f64,
}

/// Validate an advance from the record's current levels
///
/// Rejection is a hard precondition failure: callers must leave the record
/// untouched. Checks, in order: the path exists in `upgrades` (the caller
/// looked it up, so this is its table), the next level is defined, and every
/// prerequisite attached to the *target* level is satisfied.
pub fn plan_advance(path: &UpgradePath, levels: &HashMap<String, u32>) -> Result<AdvancePlan> {
    let current = levels.get(&path.key).copied().unwrap_or(0);
    let next = current + 1;
    if next > path.max_level() {
        return Err(Error::MaxLevelReached(path.key.clone()));
    }

    if let Some(requires) = path.requirements_for(next) {
        for (required_key, &min_level) in requires {
            let have = levels.get(required_key).copied().unwrap_or(0);
            if have < min_level {
                return Err(Error::PrerequisiteUnmet {
                    upgrade: path.key.clone(),
                    requires: required_key.clone(),
                    min_level,
                    current: have,
                });
            }
        }
    }

    let cost = path
        .cost_to_advance(current)
        .ok_or_else(|| Error::MaxLevelReached(path.key.clone()))?;
    Ok(AdvancePlan {
        next_level: next,
        cost,
    })
}
