//! Spawner service - the context object exposing every public operation
//!
//! Constructed once at startup and passed by handle; there is no
//! process-wide state. Owner-facing operations (place, remove, toggle,
//! reconfigure, upgrade) may run concurrently with the scheduler driver
//! calling [`tick`]; the registry mediates. Time enters every
//! time-dependent operation as an explicit monotonic `now_ms`, which keeps
//! the whole service replayable in tests.
//!
//! [`tick`]: SpawnerService::tick

use crate::config::ServiceConfig;
use crate::deferred::DeferredRecords;
use crate::economy::EconomyProvider;
use crate::error::{Error, Result};
use crate::persistence::Persistence;
use crate::registry::SpawnerRegistry;
use crate::scheduler::{TickReport, TickScheduler};
use crate::world::WorldProvider;
use spawnworks_core::{
    plan_advance, purchase_quote, resolve_effective, BlockPos, OwnerId, PlacementMode,
    PlayerLimitData, PreciseOffset, ProductId, SpawnerCategory, SpawnerRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Why an upgrade or purchase was not applied
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The path has no further level
    MaxLevel,
    /// A prerequisite on the target level is unmet
    PrerequisiteUnmet {
        requires: String,
        min_level: u32,
        current: u32,
    },
    /// The key is not defined for this category
    UnknownUpgrade,
    /// The owner cannot cover the cost
    InsufficientFunds { cost: f64 },
    /// The economy backend failed; the feature is unavailable, not broken
    EconomyUnavailable,
}

/// Result of an upgrade or limit-purchase attempt
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeOutcome {
    Applied { new_level: u32, cost: f64 },
    Rejected(RejectReason),
}

/// The engine's public entry point
pub struct SpawnerService {
    config: ServiceConfig,
    registry: Arc<SpawnerRegistry>,
    scheduler: TickScheduler,
    world: Arc<dyn WorldProvider>,
    economy: Arc<dyn EconomyProvider>,
    persistence: Arc<dyn Persistence>,
    deferred: DeferredRecords,
    players: RwLock<HashMap<OwnerId, PlayerLimitData>>,
    next_id: AtomicU64,
}

impl SpawnerService {
    pub fn new(
        config: ServiceConfig,
        world: Arc<dyn WorldProvider>,
        economy: Arc<dyn EconomyProvider>,
        persistence: Arc<dyn Persistence>,
        seed: u64,
    ) -> Self {
        let config = config.sanitized();
        let registry = Arc::new(SpawnerRegistry::new());
        let scheduler = TickScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&world),
            Arc::clone(&persistence),
            &config.engine,
            seed,
        );
        Self {
            config,
            registry,
            scheduler,
            world,
            economy,
            persistence,
            deferred: DeferredRecords::new(),
            players: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &SpawnerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Install loaded records and player data
    ///
    /// Effective parameters are re-resolved from base config for every
    /// record (only raw upgrade levels are trusted from storage), records in
    /// unloaded worlds are parked for [`retry_deferred`], and the id counter
    /// resumes above the highest persisted id.
    ///
    /// [`retry_deferred`]: SpawnerService::retry_deferred
    pub fn bootstrap(&self, records: Vec<SpawnerRecord>, players: Vec<PlayerLimitData>) {
        let mut max_id = 0;
        let mut registered = 0;
        for mut record in records {
            max_id = max_id.max(record.id);
            self.resolve_params(&mut record);
            if !self.world.is_world_loaded(&record.position.world) {
                self.deferred.park(record);
                continue;
            }
            match self.registry.insert(record) {
                Ok(()) => registered += 1,
                Err(e) => log::warn!("skipping stored spawner: {e}"),
            }
        }
        self.next_id.store(max_id + 1, Ordering::Relaxed);

        let mut map = self.players_mut();
        for data in players {
            map.insert(data.owner.clone(), data);
        }
        drop(map);

        log::info!(
            "loaded {registered} spawners ({} deferred)",
            self.deferred.len()
        );
    }

    /// Create and register a spawner for an owner
    ///
    /// `latent_upgrades` are levels carried on the placement token (a
    /// previously broken spawner keeps its upgrades); they are applied
    /// before the first parameter resolution.
    pub fn place_spawner(
        &self,
        owner: OwnerId,
        category: SpawnerCategory,
        product: ProductId,
        position: BlockPos,
        latent_upgrades: &HashMap<String, u32>,
        now_ms: u64,
    ) -> Result<SpawnerRecord> {
        if !self.world.is_world_loaded(&position.world) {
            return Err(Error::WorldUnavailable(position.world));
        }

        let cat_cfg = self.config.category(category);
        let unlocked = cat_cfg.default_products.contains(&product)
            || self
                .players()
                .get(&owner)
                .map(|p| p.has_unlocked(category, &product))
                .unwrap_or(false);
        if !unlocked {
            return Err(Error::ProductLocked(product));
        }

        let current = self.registry.count_of(&owner, category);
        let limit = cat_cfg.base_limit
            + self
                .players()
                .get(&owner)
                .map(|p| p.purchased_limit(category))
                .unwrap_or(0);
        if current >= limit as usize {
            return Err(Error::LimitReached { current, limit });
        }

        let mut record = SpawnerRecord::new(owner, category, product, position, now_ms);
        record.storage_enabled = cat_cfg.storage_enabled;
        for (key, &level) in latent_upgrades {
            if level > 0 {
                record.set_upgrade_level(key.clone(), level);
            }
        }
        self.resolve_params(&mut record);
        record.id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.registry.insert(record.clone())?;
        self.persistence.save_record(&record);
        Ok(record)
    }

    /// Remove the spawner at a position; true if one existed
    pub fn remove_spawner(&self, pos: &BlockPos) -> bool {
        match self.registry.remove(pos) {
            Some(record) => {
                self.persistence.delete_record(record.id);
                true
            }
            None => false,
        }
    }

    /// Flip between emission mode and accumulate-only mode
    pub fn toggle_active(&self, pos: &BlockPos) -> Result<bool> {
        let mut state = false;
        if !self.registry.update(pos, |r| {
            r.active = !r.active;
            state = r.active;
        }) {
            return Err(Error::NotFound(pos.clone()));
        }
        self.save(pos);
        Ok(state)
    }

    pub fn set_placement_mode(&self, pos: &BlockPos, mode: PlacementMode) -> Result<()> {
        if !self.registry.update(pos, |r| r.placement_mode = mode) {
            return Err(Error::NotFound(pos.clone()));
        }
        self.save(pos);
        Ok(())
    }

    /// Set the precise offset, clamped to the current activation range
    ///
    /// The placement strategy re-clamps on every computation as well, so a
    /// later range reduction needs no fix-up here.
    pub fn set_precise_offset(&self, pos: &BlockPos, dx: f64, dy: f64, dz: f64) -> Result<()> {
        if !self.registry.update(pos, |r| {
            r.precise_offset = PreciseOffset::new(dx, dy, dz).clamped(r.params.activation_range);
        }) {
            return Err(Error::NotFound(pos.clone()));
        }
        self.save(pos);
        Ok(())
    }

    /// Switch the emitted product, discarding buffered output of the old one
    pub fn set_product(&self, pos: &BlockPos, product: ProductId, now_ms: u64) -> Result<()> {
        let record = self.registry.get(pos).ok_or_else(|| Error::NotFound(pos.clone()))?;
        let cat_cfg = self.config.category(record.category);
        let unlocked = cat_cfg.default_products.contains(&product)
            || self
                .players()
                .get(&record.owner)
                .map(|p| p.has_unlocked(record.category, &product))
                .unwrap_or(false);
        if !unlocked {
            return Err(Error::ProductLocked(product));
        }

        self.registry.update(pos, |r| r.switch_product(product, now_ms));
        self.save(pos);
        Ok(())
    }

    /// Attempt to raise one upgrade by one level
    ///
    /// Rejection never mutates state: prerequisites and funds are verified
    /// before the level is written, and economy failures degrade to
    /// [`RejectReason::EconomyUnavailable`].
    pub fn attempt_upgrade(&self, pos: &BlockPos, key: &str) -> Result<UpgradeOutcome> {
        let record = self.registry.get(pos).ok_or_else(|| Error::NotFound(pos.clone()))?;
        let Some(path) = self.config.upgrades_for(record.category).get(key) else {
            return Ok(UpgradeOutcome::Rejected(RejectReason::UnknownUpgrade));
        };

        let plan = match plan_advance(path, &record.upgrade_levels) {
            Ok(plan) => plan,
            Err(spawnworks_core::Error::MaxLevelReached(_)) => {
                return Ok(UpgradeOutcome::Rejected(RejectReason::MaxLevel));
            }
            Err(spawnworks_core::Error::PrerequisiteUnmet {
                requires,
                min_level,
                current,
                ..
            }) => {
                return Ok(UpgradeOutcome::Rejected(RejectReason::PrerequisiteUnmet {
                    requires,
                    min_level,
                    current,
                }));
            }
            Err(spawnworks_core::Error::UnknownUpgrade(_)) => {
                return Ok(UpgradeOutcome::Rejected(RejectReason::UnknownUpgrade));
            }
        };

        if let Some(rejection) = self.charge(&record.owner, plan.cost) {
            return Ok(UpgradeOutcome::Rejected(rejection));
        }

        let key = key.to_string();
        let applied = self.registry.update(pos, |r| {
            r.set_upgrade_level(key.clone(), plan.next_level);
            let base = self.config.category(r.category).base_params();
            r.params = resolve_effective(
                &base,
                self.config.upgrades_for(r.category),
                &r.upgrade_levels,
                self.config.engine.min_emit_delay_ticks,
            );
            r.clamp_to_params();
        });
        if !applied {
            // Removed between the check and the write; funds are gone but
            // there is nothing to apply them to.
            log::warn!("spawner at {pos} vanished during upgrade");
            return Err(Error::NotFound(pos.clone()));
        }

        self.save(pos);
        Ok(UpgradeOutcome::Applied {
            new_level: plan.next_level,
            cost: plan.cost,
        })
    }

    /// Buy `amount` placement-limit increases for a category
    pub fn purchase_limit(
        &self,
        owner: &OwnerId,
        category: SpawnerCategory,
        amount: u32,
    ) -> Result<UpgradeOutcome> {
        let pricing = &self.config.category(category).pricing;
        let purchased = self
            .players()
            .get(owner)
            .map(|p| p.purchased_limit(category))
            .unwrap_or(0);
        let cost = purchase_quote(pricing, purchased, amount);

        if let Some(rejection) = self.charge(owner, cost) {
            return Ok(UpgradeOutcome::Rejected(rejection));
        }

        let mut players = self.players_mut();
        let data = players
            .entry(owner.clone())
            .or_insert_with(|| PlayerLimitData::new(owner.clone()));
        data.add_purchased_limit(category, amount);
        let new_limit = data.purchased_limit(category);
        let snapshot = data.clone();
        drop(players);

        self.persistence.save_player(&snapshot);
        Ok(UpgradeOutcome::Applied {
            new_level: new_limit,
            cost,
        })
    }

    /// Unlock a product for an owner within a category
    pub fn unlock_product(&self, owner: &OwnerId, category: SpawnerCategory, product: ProductId) {
        let mut players = self.players_mut();
        let data = players
            .entry(owner.clone())
            .or_insert_with(|| PlayerLimitData::new(owner.clone()));
        data.unlock(category, product);
        let snapshot = data.clone();
        drop(players);
        self.persistence.save_player(&snapshot);
    }

    /// Current player data (defaults for owners never seen before)
    pub fn player_data(&self, owner: &OwnerId) -> PlayerLimitData {
        self.players()
            .get(owner)
            .cloned()
            .unwrap_or_else(|| PlayerLimitData::new(owner.clone()))
    }

    /// Run one scheduler cycle
    ///
    /// Records whose block is gone are removed here (and deleted from
    /// persistence); the report still lists them so the embedding layer can
    /// react.
    pub fn tick(&self, now_ms: u64) -> TickReport {
        let report = self.scheduler.tick(now_ms);
        for pos in &report.missing {
            if let Some(record) = self.registry.remove(pos) {
                log::info!("removing spawner #{} at {pos}: block gone", record.id);
                self.persistence.delete_record(record.id);
            }
        }
        report
    }

    /// Re-attempt deferred records; driven by a slow periodic timer
    pub fn retry_deferred(&self) -> usize {
        self.deferred.retry(self.world.as_ref(), &self.registry)
    }

    /// Flush every record and player to persistence
    pub fn shutdown(&self) {
        for record in self.registry.snapshot_all() {
            self.persistence.save_record(&record);
        }
        for data in self.players().values() {
            self.persistence.save_player(data);
        }
        log::info!("spawner service shut down ({} records)", self.registry.len());
    }

    /// Charge an owner; `None` means paid (or free)
    fn charge(&self, owner: &OwnerId, cost: f64) -> Option<RejectReason> {
        if cost <= 0.0 {
            return None;
        }
        match self.economy.has_funds(owner, cost) {
            Err(e) => {
                log::warn!("economy unavailable: {e}");
                Some(RejectReason::EconomyUnavailable)
            }
            Ok(false) => Some(RejectReason::InsufficientFunds { cost }),
            Ok(true) => match self.economy.withdraw(owner, cost) {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("economy withdraw failed: {e}");
                    Some(RejectReason::EconomyUnavailable)
                }
            },
        }
    }

    fn resolve_params(&self, record: &mut SpawnerRecord) {
        let base = self.config.category(record.category).base_params();
        record.params = resolve_effective(
            &base,
            self.config.upgrades_for(record.category),
            &record.upgrade_levels,
            self.config.engine.min_emit_delay_ticks,
        );
        record.clamp_to_params();
    }

    fn save(&self, pos: &BlockPos) {
        if let Some(record) = self.registry.get(pos) {
            self.persistence.save_record(&record);
        }
    }

    fn players(&self) -> std::sync::RwLockReadGuard<'_, HashMap<OwnerId, PlayerLimitData>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn players_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<OwnerId, PlayerLimitData>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::mock::MockEconomy;
    use crate::economy::NoEconomy;
    use crate::persistence::NoPersistence;
    use crate::world::mock::MockWorld;
    use spawnworks_core::{
        CategoryConfig, UpgradeKind, UpgradeLevel, UpgradePath, UpgradeTables, WorldId,
    };
    use std::collections::HashMap;

    fn upgrade_tables() -> UpgradeTables {
        let mut standard = indexmap::IndexMap::new();
        standard.insert(
            "speed".to_string(),
            UpgradePath::new(
                "speed",
                UpgradeKind::EmitDelay,
                vec![
                    UpgradeLevel {
                        cost: 100.0,
                        value: 160.0,
                        requires: HashMap::new(),
                    },
                    UpgradeLevel {
                        cost: 200.0,
                        value: 120.0,
                        requires: HashMap::new(),
                    },
                ],
            ),
        );
        standard.insert(
            "storage".to_string(),
            UpgradePath::new(
                "storage",
                UpgradeKind::MaxStorage,
                vec![UpgradeLevel {
                    cost: 150.0,
                    value: 5.0,
                    requires: HashMap::from([("speed".to_string(), 1)]),
                }],
            ),
        );
        UpgradeTables {
            standard,
            premium: indexmap::IndexMap::new(),
        }
    }

    fn service_config() -> ServiceConfig {
        ServiceConfig {
            standard: CategoryConfig {
                base_limit: 2,
                default_products: vec![ProductId::new("zombie"), ProductId::new("skeleton")],
                ..CategoryConfig::default()
            },
            upgrades: upgrade_tables(),
            ..ServiceConfig::default()
        }
    }

    fn service(economy: Arc<dyn EconomyProvider>) -> (Arc<MockWorld>, SpawnerService) {
        let world = Arc::new(MockWorld::new());
        let svc = SpawnerService::new(
            service_config(),
            Arc::clone(&world) as Arc<dyn WorldProvider>,
            economy,
            Arc::new(NoPersistence),
            11,
        );
        (world, svc)
    }

    fn pos(x: i32) -> BlockPos {
        BlockPos::new(WorldId::new("overworld"), x, 64, 0)
    }

    fn owner() -> OwnerId {
        OwnerId::new("owner-1")
    }

    fn place(svc: &SpawnerService, x: i32) -> SpawnerRecord {
        svc.place_spawner(
            owner(),
            SpawnerCategory::Standard,
            ProductId::new("zombie"),
            pos(x),
            &HashMap::new(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn placement_assigns_ids_and_respects_the_limit() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let a = place(&svc, 0);
        let b = place(&svc, 1);
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let err = svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                ProductId::new("zombie"),
                pos(2),
                &HashMap::new(),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::LimitReached { current: 2, limit: 2 }));
    }

    #[test]
    fn purchased_limit_raises_the_cap() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        place(&svc, 0);
        place(&svc, 1);
        let outcome = svc
            .purchase_limit(&owner(), SpawnerCategory::Standard, 1)
            .unwrap();
        assert!(matches!(outcome, UpgradeOutcome::Applied { .. }));
        assert!(svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                ProductId::new("zombie"),
                pos(2),
                &HashMap::new(),
                0,
            )
            .is_ok());
    }

    #[test]
    fn locked_product_is_rejected_until_unlocked() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let creeper = ProductId::new("creeper");
        let err = svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                creeper.clone(),
                pos(0),
                &HashMap::new(),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::ProductLocked(_)));

        svc.unlock_product(&owner(), SpawnerCategory::Standard, creeper.clone());
        assert!(svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                creeper,
                pos(0),
                &HashMap::new(),
                0,
            )
            .is_ok());
    }

    #[test]
    fn latent_upgrades_resolve_at_placement() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let latent = HashMap::from([("speed".to_string(), 2)]);
        let rec = svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                ProductId::new("zombie"),
                pos(0),
                &latent,
                0,
            )
            .unwrap();
        assert_eq!(rec.params.emit_delay_ticks, 120);
    }

    #[test]
    fn unloaded_world_rejects_placement() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let err = svc
            .place_spawner(
                owner(),
                SpawnerCategory::Standard,
                ProductId::new("zombie"),
                BlockPos::new(WorldId::new("the_end"), 0, 64, 0),
                &HashMap::new(),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, Error::WorldUnavailable(_)));
    }

    #[test]
    fn toggle_flips_and_reports_the_new_state() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);
        assert_eq!(svc.toggle_active(&rec.position).unwrap(), false);
        assert_eq!(svc.toggle_active(&rec.position).unwrap(), true);
    }

    #[test]
    fn product_switch_resets_the_storage_pool() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);
        svc.registry().update(&rec.position, |r| {
            r.params.max_storage = 10;
            r.stored_count = 7;
        });

        svc.set_product(&rec.position, ProductId::new("skeleton"), 9_000)
            .unwrap();
        let after = svc.registry().get(&rec.position).unwrap();
        assert_eq!(after.stored_count, 0);
        assert_eq!(after.last_release_ms, 9_000);
        assert_eq!(after.product.as_str(), "skeleton");
    }

    #[test]
    fn upgrade_applies_and_charges() {
        let economy = Arc::new(MockEconomy::with_balance(500.0));
        let (_world, svc) = service(Arc::clone(&economy) as Arc<dyn EconomyProvider>);
        let rec = place(&svc, 0);

        let outcome = svc.attempt_upgrade(&rec.position, "speed").unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::Applied {
                new_level: 1,
                cost: 100.0
            }
        );
        assert_eq!(*economy.balance.lock().unwrap(), 400.0);
        let after = svc.registry().get(&rec.position).unwrap();
        assert_eq!(after.upgrade_level("speed"), 1);
        assert_eq!(after.params.emit_delay_ticks, 160);
    }

    #[test]
    fn unmet_prerequisite_rejects_without_mutation() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);

        let outcome = svc.attempt_upgrade(&rec.position, "storage").unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::Rejected(RejectReason::PrerequisiteUnmet {
                requires: "speed".to_string(),
                min_level: 1,
                current: 0,
            })
        );
        let after = svc.registry().get(&rec.position).unwrap();
        assert_eq!(after.upgrade_level("storage"), 0);
        assert_eq!(after.params, rec.params);
    }

    #[test]
    fn insufficient_funds_rejects_without_withdrawing() {
        let economy = Arc::new(MockEconomy::with_balance(50.0));
        let (_world, svc) = service(Arc::clone(&economy) as Arc<dyn EconomyProvider>);
        let rec = place(&svc, 0);

        let outcome = svc.attempt_upgrade(&rec.position, "speed").unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::Rejected(RejectReason::InsufficientFunds { cost: 100.0 })
        );
        assert_eq!(*economy.balance.lock().unwrap(), 50.0);
        assert_eq!(
            svc.registry().get(&rec.position).unwrap().upgrade_level("speed"),
            0
        );
    }

    #[test]
    fn economy_failure_degrades_instead_of_propagating() {
        let (_world, svc) = service(Arc::new(MockEconomy::unavailable()));
        let rec = place(&svc, 0);
        let outcome = svc.attempt_upgrade(&rec.position, "speed").unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::Rejected(RejectReason::EconomyUnavailable)
        );
    }

    #[test]
    fn beyond_max_level_rejects() {
        let economy = Arc::new(MockEconomy::with_balance(10_000.0));
        let (_world, svc) = service(economy as Arc<dyn EconomyProvider>);
        let rec = place(&svc, 0);
        svc.attempt_upgrade(&rec.position, "speed").unwrap();
        svc.attempt_upgrade(&rec.position, "speed").unwrap();
        let outcome = svc.attempt_upgrade(&rec.position, "speed").unwrap();
        assert_eq!(outcome, UpgradeOutcome::Rejected(RejectReason::MaxLevel));
    }

    #[test]
    fn unknown_upgrade_key_rejects() {
        let (_world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);
        let outcome = svc.attempt_upgrade(&rec.position, "speeed").unwrap();
        assert_eq!(outcome, UpgradeOutcome::Rejected(RejectReason::UnknownUpgrade));
    }

    #[test]
    fn tick_removes_records_whose_block_is_gone() {
        let (world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);
        world
            .missing_blocks
            .lock()
            .unwrap()
            .insert(rec.position.clone());

        let report = svc.tick(10_000);
        assert_eq!(report.missing, vec![rec.position.clone()]);
        assert!(svc.registry().get(&rec.position).is_none());
    }

    #[test]
    fn reinsertion_after_removal_is_visible_to_the_next_cycle() {
        let (world, svc) = service(Arc::new(NoEconomy));
        let rec = place(&svc, 0);
        assert!(svc.remove_spawner(&rec.position));
        place(&svc, 0);

        let report = svc.tick(10_000);
        assert_eq!(report.scanned, 1);
        assert!(world.materialized_count() > 0);
    }

    #[test]
    fn bootstrap_defers_unloaded_worlds_and_resumes_ids() {
        let (world, svc) = service(Arc::new(NoEconomy));
        let mut stored = SpawnerRecord::new(
            owner(),
            SpawnerCategory::Standard,
            ProductId::new("zombie"),
            BlockPos::new(WorldId::new("the_end"), 0, 64, 0),
            0,
        );
        stored.id = 41;
        svc.bootstrap(vec![stored], Vec::new());
        assert!(svc.registry().is_empty());

        // A new placement continues above the stored id.
        let rec = place(&svc, 1);
        assert_eq!(rec.id, 42);

        // World shows up later: the deferred record registers.
        world.loaded.lock().unwrap().insert(WorldId::new("the_end"));
        assert_eq!(svc.retry_deferred(), 1);
        assert_eq!(svc.registry().len(), 2);
    }
}
