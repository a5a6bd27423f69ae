//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter (one tick is one simulated day)
pub type Tick = u64;

/// Integer tile coordinate on the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the metric used for building ranges
    pub fn chebyshev(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// The four orthogonal neighbours (may lie outside the world)
    pub fn neighbors4(&self) -> [TilePos; 4] {
        [
            TilePos::new(self.x, self.y - 1),
            TilePos::new(self.x - 1, self.y),
            TilePos::new(self.x + 1, self.y),
            TilePos::new(self.x, self.y + 1),
        ]
    }
}

/// Unique identifier for a placed construction
///
/// Assigned by the world when a build request succeeds; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstructionId(pub u64);

/// Index of a construction group in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u16);

impl GroupId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
