//! Normalized world positions
//!
//! A `BlockPos` is the canonical key for a spawner: integer block coordinates
//! plus the world they belong to. Sub-block offsets and orientation (yaw,
//! pitch) never enter the type, so two positions that address the same block
//! always compare equal and normalization is idempotent by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a world (dimension) as reported by the world collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub String);

impl WorldId {
    /// Create a new world ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorldId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A normalized block position: world plus integer block coordinates
///
/// This is the registry key for spawner records. Construct it either from
/// already-integer coordinates with [`BlockPos::new`] or from continuous
/// coordinates with [`BlockPos::normalized`], which floors each axis to the
/// containing block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// World this position belongs to
    pub world: WorldId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Create a position from integer block coordinates
    pub fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// Normalize continuous coordinates to the containing block
    ///
    /// Flooring (not truncation) so that negative coordinates land in the
    /// correct block: `-0.5` is in block `-1`.
    pub fn normalized(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x: x.floor() as i32,
            y: y.floor() as i32,
            z: z.floor() as i32,
        }
    }

    /// Stable string key, usable as a database secondary key
    pub fn key(&self) -> String {
        format!("{}:{}:{}:{}", self.world, self.x, self.y, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}
