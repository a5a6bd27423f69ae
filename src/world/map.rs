//! World map - fixed-size grid of tiles owning every construction

use crate::city::construction::Construction;
use crate::city::group::ConstructionGroup;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{ConstructionId, TilePos};
use crate::spatial::grid::Grid;
use crate::world::tile::MapTile;

/// The city map
#[derive(Debug, Clone)]
pub struct World {
    grid: Grid<MapTile>,
    next_construction_id: u64,
}

impl World {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
            next_construction_id: 1,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.world_width, config.world_height)
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    #[inline]
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        self.grid.contains(x, y)
    }

    /// True for tiles on the outer edge
    pub fn is_border(&self, x: i32, y: i32) -> bool {
        self.is_inside(x, y)
            && (x == 0
                || y == 0
                || x as usize == self.grid.width - 1
                || y as usize == self.grid.height - 1)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> SimError {
        SimError::OutOfBounds {
            x,
            y,
            width: self.grid.width,
            height: self.grid.height,
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Result<&MapTile> {
        self.grid.get(x, y).ok_or_else(|| self.out_of_bounds(x, y))
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Result<&mut MapTile> {
        let err = self.out_of_bounds(x, y);
        self.grid.get_mut(x, y).ok_or(err)
    }

    /// Construction on a tile, bulldozed or not; `None` outside the map
    pub fn construction_at(&self, x: i32, y: i32) -> Option<&Construction> {
        self.grid.get(x, y)?.construction.as_ref()
    }

    pub fn construction_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Construction> {
        self.grid.get_mut(x, y)?.construction.as_mut()
    }

    /// Live construction on a tile
    pub fn live_construction_at(&self, x: i32, y: i32) -> Option<&Construction> {
        self.grid.get(x, y)?.live_construction()
    }

    /// Put a fresh construction of `group` on a tile, replacing whatever is there
    ///
    /// Occupancy is checked by the request queue, the only caller.
    pub(crate) fn place_construction(
        &mut self,
        group: &ConstructionGroup,
        x: i32,
        y: i32,
    ) -> Result<ConstructionId> {
        let id = ConstructionId(self.next_construction_id);
        let tile = self.tile_mut(x, y)?;
        tile.construction = Some(group.create_construction(id, TilePos::new(x, y)));
        self.next_construction_id += 1;
        Ok(id)
    }

    /// In-bounds orthogonal neighbours of a tile
    pub fn neighbors4(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        pos.neighbors4()
            .into_iter()
            .filter(move |p| self.is_inside(p.x, p.y))
    }

    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.grid.index_of(x, y)
    }

    #[inline]
    pub fn pos_of(&self, index: usize) -> TilePos {
        let (x, y) = self.grid.coords_of(index);
        TilePos::new(x, y)
    }

    /// Tiles in row-major order
    pub fn tiles(&self) -> &[MapTile] {
        self.grid.cells()
    }

    pub fn tiles_mut(&mut self) -> &mut [MapTile] {
        self.grid.cells_mut()
    }

    /// Live constructions in row-major order
    pub fn constructions(&self) -> impl Iterator<Item = &Construction> + '_ {
        self.grid.cells().iter().filter_map(MapTile::live_construction)
    }

    pub fn live_construction_count(&self) -> usize {
        self.constructions().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::catalog::ConstructionCatalog;

    #[test]
    fn test_world_bounds() {
        let world = World::new(100, 100);
        assert!(world.is_inside(0, 0));
        assert!(world.is_inside(99, 99));
        assert!(!world.is_inside(-1, 50));
        assert!(!world.is_inside(100, 50));
        assert!(matches!(
            world.tile(100, 50),
            Err(SimError::OutOfBounds { x: 100, y: 50, .. })
        ));
        assert!(world.tile(50, 50).is_ok());
    }

    #[test]
    fn test_world_border() {
        let world = World::new(10, 5);
        assert!(world.is_border(0, 2));
        assert!(world.is_border(9, 2));
        assert!(world.is_border(4, 4));
        assert!(!world.is_border(4, 2));
        assert!(!world.is_border(10, 2));
    }

    #[test]
    fn test_place_assigns_unique_ids() {
        let catalog = ConstructionCatalog::with_defaults();
        let road = catalog.by_key("road").expect("road");
        let mut world = World::new(4, 4);

        let a = world.place_construction(road, 0, 0).expect("in bounds");
        let b = world.place_construction(road, 1, 0).expect("in bounds");
        assert_ne!(a, b);
        assert_eq!(world.construction_at(1, 0).map(|c| c.id), Some(b));
        assert_eq!(world.construction_at(1, 0).map(|c| c.pos), Some(TilePos::new(1, 0)));
        assert!(world.place_construction(road, 4, 0).is_err());
    }

    #[test]
    fn test_constructions_skip_bulldozed() {
        let catalog = ConstructionCatalog::with_defaults();
        let road = catalog.by_key("road").expect("road");
        let mut world = World::new(4, 4);
        world.place_construction(road, 2, 0).expect("in bounds");
        world.place_construction(road, 0, 1).expect("in bounds");

        if let Some(c) = world.construction_at_mut(2, 0) {
            c.bulldoze();
        }
        assert_eq!(world.live_construction_count(), 1);
        assert!(world.construction_at(2, 0).is_some());
        assert!(world.live_construction_at(2, 0).is_none());
    }

    #[test]
    fn test_neighbors_clipped_at_edge() {
        let world = World::new(3, 3);
        let corner: Vec<_> = world.neighbors4(TilePos::new(0, 0)).collect();
        assert_eq!(corner.len(), 2);
        assert_eq!(world.neighbors4(TilePos::new(1, 1)).count(), 4);
        assert_eq!(world.pos_of(world.index_of(2, 1).expect("inside")), TilePos::new(2, 1));
    }
}
