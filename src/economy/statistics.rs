//! City statistics - a read-only rescan of the map

use serde::{Deserialize, Serialize};

use crate::city::catalog::ConstructionCatalog;
use crate::city::commodity::CommodityKind;
use crate::city::group::{Behavior, GroupCategory};
use crate::world::World;

/// Aggregate figures from the last rescan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Live constructions
    pub total_buildings: u32,
    pub residences: u32,
    pub power_plants: u32,
    pub industry: u32,
    pub commerce: u32,
    pub utilities: u32,
    pub transport: u32,
    pub operational: u32,
    /// Bulldozed constructions still occupying a tile
    pub wrecks: u32,
    pub population: u32,
    pub housing_capacity: u32,
    /// Labor wanted per tick by non-residential constructions
    pub available_jobs: u32,
    pub total_pollution: u64,
    /// High-voltage electricity generated last tick
    pub power_generated: u32,
    /// Low-voltage electricity delivered by substations last tick
    pub power_delivered: u32,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan every tile
    pub fn update(&mut self, world: &World, catalog: &ConstructionCatalog) {
        *self = Self::default();

        for tile in world.tiles() {
            self.total_pollution += tile.pollution as u64;

            let Some(construction) = tile.construction.as_ref() else {
                continue;
            };
            if construction.bulldozed {
                self.wrecks += 1;
                continue;
            }
            self.total_buildings += 1;
            if construction.operational {
                self.operational += 1;
            }

            let Some(group) = catalog.get(construction.group) else {
                continue;
            };
            match group.category {
                GroupCategory::Residence => self.residences += 1,
                GroupCategory::Power => self.power_plants += 1,
                GroupCategory::Industry => self.industry += 1,
                GroupCategory::Commerce => self.commerce += 1,
                GroupCategory::Utility => self.utilities += 1,
                GroupCategory::Transport => self.transport += 1,
            }

            match &group.behavior {
                Behavior::Residence { max_population, .. } => {
                    self.population += construction.population;
                    self.housing_capacity += max_population;
                }
                Behavior::Substation { .. } => {
                    self.power_delivered += construction.power_output;
                }
                Behavior::Recipe(recipe) => {
                    self.available_jobs += construction.max_consumption(CommodityKind::Labor);
                    if recipe.output(CommodityKind::HiVolt) > 0 {
                        self.power_generated += construction.power_output;
                    }
                }
                Behavior::Transport | Behavior::Market { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::request::{ConstructionRequest, RequestPolicy, RequestQueue};
    use crate::economy::Economy;

    #[test]
    fn test_statistics_counts_categories() {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(8, 8);
        let mut economy = Economy::new(1_000_000, 10);
        let mut queue = RequestQueue::new();
        for (key, x) in [
            ("residence-ll", 0),
            ("residence-hh", 1),
            ("light-industry", 2),
            ("road", 3),
            ("coal-power", 4),
        ] {
            let group = catalog.id_of(key).expect(key);
            queue.submit(ConstructionRequest::Build { group, x, y: 0 });
        }
        queue.submit(ConstructionRequest::Bulldoze { x: 3, y: 0 });
        queue.drain(&mut world, &catalog, &mut economy, RequestPolicy::default());
        world.tile_mut(7, 7).expect("inside").pollution = 40;

        let mut stats = Statistics::new();
        stats.update(&world, &catalog);
        assert_eq!(stats.total_buildings, 4);
        assert_eq!(stats.residences, 2);
        assert_eq!(stats.industry, 1);
        assert_eq!(stats.power_plants, 1);
        assert_eq!(stats.transport, 0);
        assert_eq!(stats.wrecks, 1);
        assert_eq!(stats.housing_capacity, 350);
        assert_eq!(stats.available_jobs, 20);
        assert_eq!(stats.total_pollution, 40);
        assert_eq!(stats.population, 0);
    }
}
