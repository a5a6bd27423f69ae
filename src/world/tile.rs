//! Map tiles

use serde::{Deserialize, Serialize};

use crate::city::construction::Construction;

/// Terrain under a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroundKind {
    #[default]
    Grass,
    Water,
    Desert,
    Forest,
    Mountain,
}

/// One cell of the world grid
///
/// A tile holds at most one construction. A bulldozed construction stays in
/// the slot until a build overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    pub ground: GroundKind,
    pub pollution: u32,
    pub altitude: i32,
    pub construction: Option<Construction>,
}

impl MapTile {
    pub fn new(ground: GroundKind) -> Self {
        Self {
            ground,
            ..Self::default()
        }
    }

    /// The construction on this tile unless it has been bulldozed
    pub fn live_construction(&self) -> Option<&Construction> {
        self.construction.as_ref().filter(|c| c.is_live())
    }

    pub fn live_construction_mut(&mut self) -> Option<&mut Construction> {
        self.construction.as_mut().filter(|c| c.is_live())
    }

    /// Decay pollution by `pollution / divisor`
    pub fn decay_pollution(&mut self, divisor: u32) {
        if divisor > 0 {
            self.pollution -= self.pollution / divisor;
        }
    }
}
