//! Production system - steps every live construction once per tick
//!
//! Each step reads and writes only its own tile, so above the configured
//! threshold the tiles are processed on the rayon pool. Results are identical
//! to the sequential row-major pass.
//!
//! Per tile:
//! - run the construction's `do_sim_step`
//! - add its emission and any spilled waste to the tile's pollution
//! - decay the tile's pollution by `pollution / divisor`

use rayon::prelude::*;
use serde::Serialize;

use crate::city::catalog::ConstructionCatalog;
use crate::world::tile::MapTile;
use crate::world::World;

/// Aggregate result of one production pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductionSummary {
    /// Constructions that ran their update
    pub stepped: u32,
    pub operational: u32,
    /// Waste that overflowed storage and became pollution
    pub waste_spilled: u64,
}

impl ProductionSummary {
    fn merge(self, other: Self) -> Self {
        Self {
            stepped: self.stepped + other.stepped,
            operational: self.operational + other.operational,
            waste_spilled: self.waste_spilled + other.waste_spilled,
        }
    }
}

fn step_tile(
    tile: &mut MapTile,
    catalog: &ConstructionCatalog,
    decay_divisor: u32,
) -> ProductionSummary {
    let mut summary = ProductionSummary::default();

    if let Some(construction) = tile.live_construction_mut() {
        if let Some(group) = catalog.get(construction.group) {
            let outcome = construction.do_sim_step(group);
            summary.stepped = 1;
            summary.operational = outcome.operational as u32;
            summary.waste_spilled = outcome.waste_spill as u64;

            let emitted = construction.pollution.saturating_add(outcome.waste_spill);
            tile.pollution = tile.pollution.saturating_add(emitted);
        }
    }

    tile.decay_pollution(decay_divisor);
    summary
}

/// Step all constructions in row-major order
///
/// Runs in parallel when the world holds at least `parallel_threshold` live
/// constructions.
pub fn tick_production(
    world: &mut World,
    catalog: &ConstructionCatalog,
    decay_divisor: u32,
    parallel_threshold: usize,
) -> ProductionSummary {
    let live = world.live_construction_count();

    let summary = if live >= parallel_threshold {
        world
            .tiles_mut()
            .par_iter_mut()
            .map(|tile| step_tile(tile, catalog, decay_divisor))
            .reduce(ProductionSummary::default, ProductionSummary::merge)
    } else {
        world
            .tiles_mut()
            .iter_mut()
            .map(|tile| step_tile(tile, catalog, decay_divisor))
            .fold(ProductionSummary::default(), ProductionSummary::merge)
    };

    tracing::debug!(
        "Production: {} stepped, {} operational, {} waste spilled",
        summary.stepped,
        summary.operational,
        summary.waste_spilled
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::commodity::CommodityKind;
    use crate::city::request::{ConstructionRequest, RequestPolicy, RequestQueue};
    use crate::economy::Economy;

    fn town(placements: &[(&str, i32, i32)]) -> (World, ConstructionCatalog) {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(8, 8);
        let mut queue = RequestQueue::new();
        let mut economy = Economy::default();
        for &(key, x, y) in placements {
            let group = catalog.id_of(key).expect(key);
            queue.submit(ConstructionRequest::Build { group, x, y });
        }
        let policy = RequestPolicy {
            charge_construction_costs: false,
            enforce_tech_level: false,
        };
        queue.drain(&mut world, &catalog, &mut economy, policy);
        (world, catalog)
    }

    #[test]
    fn test_tick_production_basic() {
        let (mut world, catalog) = town(&[("organic-farm", 0, 0), ("coal-power", 2, 2)]);

        let summary = tick_production(&mut world, &catalog, 64, usize::MAX);
        assert_eq!(summary.stepped, 2);
        // The farm needs nothing, the plant has no coal
        assert_eq!(summary.operational, 1);

        let farm = world.construction_at(0, 0).expect("farm");
        assert!(farm.operational);
        assert_eq!(farm.stock(CommodityKind::Food), 50);
        assert!(!world.construction_at(2, 2).expect("plant").operational);
    }

    #[test]
    fn test_tick_production_skips_bulldozed() {
        let (mut world, catalog) = town(&[("organic-farm", 0, 0)]);
        if let Some(farm) = world.construction_at_mut(0, 0) {
            farm.bulldoze();
        }

        let summary = tick_production(&mut world, &catalog, 64, usize::MAX);
        assert_eq!(summary.stepped, 0);
        assert_eq!(world.construction_at(0, 0).expect("wreck").stock(CommodityKind::Food), 0);
    }

    #[test]
    fn test_pollution_emitted_and_decayed() {
        let (mut world, catalog) = town(&[("coal-power", 1, 1)]);
        if let Some(plant) = world.construction_at_mut(1, 1) {
            plant.set_stock(CommodityKind::Coal, 1000);
        }

        tick_production(&mut world, &catalog, 4, usize::MAX);
        // 20 emitted, then 20 / 4 decays
        assert_eq!(world.tile(1, 1).expect("inside").pollution, 15);

        world.tile_mut(5, 5).expect("inside").pollution = 100;
        tick_production(&mut world, &catalog, 4, usize::MAX);
        assert_eq!(world.tile(5, 5).expect("inside").pollution, 75);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let placements = [
            ("organic-farm", 0, 0),
            ("coal-power", 2, 0),
            ("residence-ll", 4, 0),
            ("substation", 6, 0),
            ("road", 0, 2),
            ("light-industry", 2, 2),
        ];
        let (mut sequential, catalog) = town(&placements);
        let (mut parallel, _) = town(&placements);
        for world in [&mut sequential, &mut parallel] {
            if let Some(plant) = world.construction_at_mut(2, 0) {
                plant.set_stock(CommodityKind::Coal, 300);
            }
            if let Some(sub) = world.construction_at_mut(6, 0) {
                sub.set_stock(CommodityKind::HiVolt, 500);
            }
        }

        for _ in 0..40 {
            let a = tick_production(&mut sequential, &catalog, 64, usize::MAX);
            let b = tick_production(&mut parallel, &catalog, 64, 0);
            assert_eq!(a, b);
        }
        assert_eq!(sequential.tiles(), parallel.tiles());
    }
}
