//! Fire - monthly random destruction of constructions
//!
//! Every live construction burns with probability
//! `fire_chance / FIRE_CHANCE_DIVISOR`. The RNG is seeded from config so a
//! run can be replayed exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::city::catalog::ConstructionCatalog;
use crate::core::types::{ConstructionId, GroupId};
use crate::world::World;

pub const FIRE_CHANCE_DIVISOR: u32 = 10_000;

/// A construction lost to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireEvent {
    pub id: ConstructionId,
    pub group: GroupId,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct FireSystem {
    rng: ChaCha8Rng,
}

impl FireSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Roll once for every live construction in row-major order and bulldoze
    /// the ones that burn
    pub fn check(&mut self, world: &mut World, catalog: &ConstructionCatalog) -> Vec<FireEvent> {
        let mut events = Vec::new();
        for tile in world.tiles_mut() {
            let Some(construction) = tile.live_construction_mut() else {
                continue;
            };
            let chance = catalog
                .get(construction.group)
                .map(|g| g.fire_chance)
                .unwrap_or(0);

            let roll = self.rng.gen_range(0..FIRE_CHANCE_DIVISOR);
            if roll < chance {
                construction.bulldoze();
                tracing::info!(
                    "Fire destroyed construction {} at ({}, {})",
                    construction.id.0,
                    construction.pos.x,
                    construction.pos.y
                );
                events.push(FireEvent {
                    id: construction.id,
                    group: construction.group,
                    x: construction.pos.x,
                    y: construction.pos.y,
                });
            }
        }
        events
    }
}
