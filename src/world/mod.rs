//! World map and tiles

pub mod map;
pub mod tile;

pub use map::World;
pub use tile::{GroundKind, MapTile};
