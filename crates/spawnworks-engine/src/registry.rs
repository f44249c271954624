//! Spawner registry - concurrent keyed store with a resumable batch cursor
//!
//! The registry is the single source of truth for spawner existence. One
//! lock guards the record map, the owner index and the batch cursor, so an
//! insert or removal is atomic across all three. The record map is an
//! `IndexMap`: iteration order is insertion order, which makes the batch
//! cursor a plain index instead of depending on hash-map iterator semantics.
//!
//! Callers get record *clones* and apply mutations through [`update`], so no
//! registry lock is ever held across a call into the world collaborator.
//!
//! [`update`]: SpawnerRegistry::update

use crate::error::{Error, Result};
use indexmap::IndexMap;
use spawnworks_core::{BlockPos, OwnerId, SpawnerCategory, SpawnerRecord};
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct Inner {
    records: IndexMap<BlockPos, SpawnerRecord>,
    by_owner: HashMap<OwnerId, HashSet<BlockPos>>,
    /// Next index the batch iterator will visit
    cursor: usize,
}

/// Concurrent keyed store of spawner records
pub struct SpawnerRegistry {
    inner: RwLock<Inner>,
}

impl SpawnerRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: IndexMap::new(),
                by_owner: HashMap::new(),
                cursor: 0,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a record under its normalized position
    ///
    /// Fails if a live record already holds the key. The owner index is
    /// updated under the same lock.
    pub fn insert(&self, record: SpawnerRecord) -> Result<()> {
        let mut inner = self.write();
        if inner.records.contains_key(&record.position) {
            return Err(Error::PositionOccupied(record.position.clone()));
        }
        let key = record.position.clone();
        let owner = record.owner.clone();
        inner.records.insert(key.clone(), record);
        inner.by_owner.entry(owner).or_default().insert(key);
        Ok(())
    }

    /// Remove the record at a key, deregistering it from the owner index
    ///
    /// The cursor is adjusted so a removal never causes the batch iterator
    /// to skip or revisit an unrelated entry.
    pub fn remove(&self, pos: &BlockPos) -> Option<SpawnerRecord> {
        let mut inner = self.write();
        let index = inner.records.get_index_of(pos)?;
        // shift_remove keeps the order of the remaining entries stable
        let record = inner.records.shift_remove(pos)?;
        if index < inner.cursor {
            inner.cursor -= 1;
        }
        if inner.cursor >= inner.records.len() {
            inner.cursor = 0;
        }
        if let Some(set) = inner.by_owner.get_mut(&record.owner) {
            set.remove(pos);
            if set.is_empty() {
                inner.by_owner.remove(&record.owner);
            }
        }
        Some(record)
    }

    /// Clone of the record at a key, if present
    pub fn get(&self, pos: &BlockPos) -> Option<SpawnerRecord> {
        self.read().records.get(pos).cloned()
    }

    pub fn contains(&self, pos: &BlockPos) -> bool {
        self.read().records.contains_key(pos)
    }

    /// Apply a mutation to a live record; returns false if it is gone
    pub fn update<F>(&self, pos: &BlockPos, f: F) -> bool
    where
        F: FnOnce(&mut SpawnerRecord),
    {
        let mut inner = self.write();
        match inner.records.get_mut(pos) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    /// Clones of all records owned by a player
    pub fn all_of(&self, owner: &OwnerId) -> Vec<SpawnerRecord> {
        let inner = self.read();
        match inner.by_owner.get(owner) {
            Some(keys) => keys
                .iter()
                .filter_map(|k| inner.records.get(k).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Live record count for an owner within one category
    pub fn count_of(&self, owner: &OwnerId, category: SpawnerCategory) -> usize {
        let inner = self.read();
        match inner.by_owner.get(owner) {
            Some(keys) => keys
                .iter()
                .filter_map(|k| inner.records.get(k))
                .filter(|r| r.category == category)
                .count(),
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Up to `max_n` keys, resuming where the previous batch left off
    ///
    /// Round-robin across the whole map: successive calls cover every entry
    /// before revisiting one, independent of total registry size. Keys are
    /// cloned out; a record removed after this call simply misses its
    /// existence check when the caller comes back to apply work.
    pub fn next_batch(&self, max_n: usize) -> Vec<BlockPos> {
        let mut inner = self.write();
        let len = inner.records.len();
        if len == 0 || max_n == 0 {
            return Vec::new();
        }
        let take = max_n.min(len);
        let mut keys = Vec::with_capacity(take);
        for i in 0..take {
            let idx = (inner.cursor + i) % len;
            if let Some((key, _)) = inner.records.get_index(idx) {
                keys.push(key.clone());
            }
        }
        inner.cursor = (inner.cursor + take) % len;
        keys
    }

    /// Clones of every record, for shutdown saves
    pub fn snapshot_all(&self) -> Vec<SpawnerRecord> {
        self.read().records.values().cloned().collect()
    }
}

impl Default for SpawnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spawnworks_core::{ProductId, WorldId};

    fn record(owner: &str, x: i32) -> SpawnerRecord {
        SpawnerRecord::new(
            OwnerId::new(owner),
            SpawnerCategory::Standard,
            ProductId::new("zombie"),
            BlockPos::new(WorldId::new("overworld"), x, 64, 0),
            0,
        )
    }

    #[test]
    fn insert_rejects_duplicate_keys() {
        let reg = SpawnerRegistry::new();
        reg.insert(record("a", 1)).unwrap();
        assert!(matches!(
            reg.insert(record("b", 1)),
            Err(Error::PositionOccupied(_))
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_deregisters_owner_index() {
        let reg = SpawnerRegistry::new();
        let rec = record("a", 1);
        let pos = rec.position.clone();
        let owner = rec.owner.clone();
        reg.insert(rec).unwrap();
        assert_eq!(reg.all_of(&owner).len(), 1);
        assert!(reg.remove(&pos).is_some());
        assert!(reg.all_of(&owner).is_empty());
        assert!(reg.remove(&pos).is_none());
    }

    #[test]
    fn count_of_filters_by_category() {
        let reg = SpawnerRegistry::new();
        reg.insert(record("a", 1)).unwrap();
        let mut premium = record("a", 2);
        premium.category = SpawnerCategory::Premium;
        reg.insert(premium).unwrap();
        let owner = OwnerId::new("a");
        assert_eq!(reg.count_of(&owner, SpawnerCategory::Standard), 1);
        assert_eq!(reg.count_of(&owner, SpawnerCategory::Premium), 1);
    }

    #[test]
    fn batches_are_fair_round_robin() {
        let reg = SpawnerRegistry::new();
        for x in 0..6 {
            reg.insert(record("a", x)).unwrap();
        }
        let first = reg.next_batch(3);
        let second = reg.next_batch(3);
        let mut seen: Vec<i32> = first.iter().chain(&second).map(|p| p.x).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);

        // Third batch wraps around to the beginning.
        let third = reg.next_batch(3);
        assert_eq!(third[0].x, 0);
    }

    #[test]
    fn batch_larger_than_registry_visits_each_entry_once() {
        let reg = SpawnerRegistry::new();
        for x in 0..3 {
            reg.insert(record("a", x)).unwrap();
        }
        let batch = reg.next_batch(10);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn removal_before_cursor_keeps_rotation_aligned() {
        let reg = SpawnerRegistry::new();
        for x in 0..5 {
            reg.insert(record("a", x)).unwrap();
        }
        let first = reg.next_batch(2);
        assert_eq!(first.iter().map(|p| p.x).collect::<Vec<_>>(), vec![0, 1]);

        // Remove an already-visited entry; the next batch must continue at 2.
        reg.remove(&BlockPos::new(WorldId::new("overworld"), 0, 64, 0));
        let second = reg.next_batch(2);
        assert_eq!(second.iter().map(|p| p.x).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn insertion_becomes_visible_without_restarting_the_scan() {
        let reg = SpawnerRegistry::new();
        for x in 0..4 {
            reg.insert(record("a", x)).unwrap();
        }
        reg.next_batch(2);
        reg.insert(record("a", 99)).unwrap();
        let rest = reg.next_batch(3);
        assert_eq!(rest.iter().map(|p| p.x).collect::<Vec<_>>(), vec![2, 3, 99]);
    }

    #[test]
    fn update_mutates_in_place() {
        let reg = SpawnerRegistry::new();
        let rec = record("a", 1);
        let pos = rec.position.clone();
        reg.insert(rec).unwrap();
        assert!(reg.update(&pos, |r| r.stored_count = 3));
        assert_eq!(reg.get(&pos).unwrap().stored_count, 3);
        let gone = BlockPos::new(WorldId::new("overworld"), 42, 64, 0);
        assert!(!reg.update(&gone, |r| r.stored_count = 9));
    }
}
