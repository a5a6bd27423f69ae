//! Transport network - which constructions can trade with each other
//!
//! Roads, power lines and substations form 4-connected components. Every
//! other construction joins the components it touches, and range-linked
//! groups (markets, substations) additionally reach every participant within
//! their Chebyshev range. Pools are the union-find closure of those links, so
//! every participant belongs to exactly one pool.

use ahash::AHashMap;

use crate::city::catalog::ConstructionCatalog;
use crate::world::World;

/// Disjoint-set forest over tile indices
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// A set of participants that exchange commodities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    /// Row-major tile indices, ascending
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Empty,
    /// Connectivity only
    Carrier,
    /// Trades and conducts (substation)
    Node,
    /// Trades
    Participant,
}

impl Role {
    fn conducts(self) -> bool {
        matches!(self, Role::Carrier | Role::Node)
    }

    fn trades(self) -> bool {
        matches!(self, Role::Node | Role::Participant)
    }
}

/// Partition all trading constructions into exchange pools
///
/// Pools are ordered by their first member; singleton pools are dropped.
pub fn build_pools(world: &World, catalog: &ConstructionCatalog) -> Vec<Pool> {
    let tiles = world.tiles();
    let mut roles = vec![Role::Empty; tiles.len()];
    let mut ranges = vec![0u32; tiles.len()];

    for (i, tile) in tiles.iter().enumerate() {
        let Some(construction) = tile.live_construction() else {
            continue;
        };
        let Some(group) = catalog.get(construction.group) else {
            continue;
        };
        roles[i] = if group.behavior.is_carrier() {
            Role::Carrier
        } else if group.behavior.is_transport_node() {
            Role::Node
        } else {
            Role::Participant
        };
        ranges[i] = group.range;
    }

    let mut sets = DisjointSet::new(tiles.len());
    for i in 0..tiles.len() {
        let role = roles[i];
        if role == Role::Empty {
            continue;
        }

        let pos = world.pos_of(i);
        for neighbor in world.neighbors4(pos) {
            let Some(j) = world.index_of(neighbor.x, neighbor.y) else {
                continue;
            };
            if roles[j] != Role::Empty && (role.conducts() || roles[j].conducts()) {
                sets.union(i, j);
            }
        }

        // Nothing lies further away than the longer map edge
        let longest = u32::try_from(world.width().max(world.height())).unwrap_or(u32::MAX);
        let range = ranges[i].min(longest) as i32;
        if role.trades() && range > 0 {
            let max_x = world.width() as i32 - 1;
            let max_y = world.height() as i32 - 1;
            for y in (pos.y - range).max(0)..=(pos.y + range).min(max_y) {
                for x in (pos.x - range).max(0)..=(pos.x + range).min(max_x) {
                    if let Some(j) = world.index_of(x, y) {
                        if j != i && roles[j].trades() {
                            sets.union(i, j);
                        }
                    }
                }
            }
        }
    }

    let mut by_root: AHashMap<usize, usize> = AHashMap::new();
    let mut pools: Vec<Pool> = Vec::new();
    for i in 0..tiles.len() {
        if !roles[i].trades() {
            continue;
        }
        let root = sets.find(i);
        let slot = *by_root.entry(root).or_insert_with(|| {
            pools.push(Pool { members: Vec::new() });
            pools.len() - 1
        });
        pools[slot].members.push(i);
    }

    pools.retain(|pool| pool.members.len() > 1);
    pools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::commodity::{CommodityKind, CommodityRule};
    use crate::city::group::{Behavior, ConstructionGroup, GroupCategory};
    use crate::city::request::{ConstructionRequest, RequestPolicy, RequestQueue};
    use crate::economy::Economy;

    fn build(world: &mut World, catalog: &ConstructionCatalog, placements: &[(&str, i32, i32)]) {
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
        let outcomes = queue.drain(world, catalog, &mut economy, policy);
        assert!(outcomes.iter().all(|o| !o.is_rejected()));
    }

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(1), sets.find(3));
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(2), sets.find(0));
    }

    #[test]
    fn test_road_connects_buildings() {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(10, 3);
        build(
            &mut world,
            &catalog,
            &[
                ("coal-mine", 0, 0),
                ("road", 1, 0),
                ("road", 2, 0),
                ("road", 3, 0),
                ("heavy-industry", 4, 0),
                ("light-industry", 8, 2),
            ],
        );

        let pools = build_pools(&world, &catalog);
        assert_eq!(pools.len(), 1);
        let mine = world.index_of(0, 0).expect("inside");
        let industry = world.index_of(4, 0).expect("inside");
        assert_eq!(pools[0].members, vec![mine, industry]);
    }

    #[test]
    fn test_adjacent_buildings_without_road_not_connected() {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(5, 5);
        build(
            &mut world,
            &catalog,
            &[("coal-mine", 0, 0), ("heavy-industry", 1, 0)],
        );
        assert!(build_pools(&world, &catalog).is_empty());
    }

    #[test]
    fn test_market_range_links_participants() {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(40, 40);
        build(
            &mut world,
            &catalog,
            &[
                ("market", 20, 20),
                ("organic-farm", 5, 5),
                ("residence-ll", 35, 35),
                ("light-industry", 0, 0),
            ],
        );

        let pools = build_pools(&world, &catalog);
        assert_eq!(pools.len(), 1);
        let members = &pools[0].members;
        assert!(members.contains(&world.index_of(20, 20).expect("inside")));
        assert!(members.contains(&world.index_of(5, 5).expect("inside")));
        assert!(members.contains(&world.index_of(35, 35).expect("inside")));
        // Chebyshev distance 20 is out of range
        assert!(!members.contains(&world.index_of(0, 0).expect("inside")));
    }

    #[test]
    fn test_unbounded_range_reaches_whole_map() {
        let mut catalog = ConstructionCatalog::with_defaults();
        let beacon = ConstructionGroup::new(
            "beacon",
            "Beacon",
            GroupCategory::Commerce,
            Behavior::Market { throughput: 10 },
        )
        .with_range(u32::MAX)
        .with_rule(CommodityKind::Food, CommodityRule::buffer(1000));
        catalog.add(beacon).expect("beacon");

        let mut world = World::new(20, 20);
        build(
            &mut world,
            &catalog,
            &[("beacon", 0, 0), ("organic-farm", 16, 16), ("coal-mine", 16, 0)],
        );

        let pools = build_pools(&world, &catalog);
        assert_eq!(pools.len(), 1);
        let members = &pools[0].members;
        assert!(members.contains(&world.index_of(0, 0).expect("inside")));
        assert!(members.contains(&world.index_of(16, 16).expect("inside")));
        assert!(members.contains(&world.index_of(16, 0).expect("inside")));
    }

    #[test]
    fn test_bulldozed_road_breaks_link() {
        let catalog = ConstructionCatalog::with_defaults();
        let mut world = World::new(5, 1);
        build(
            &mut world,
            &catalog,
            &[("coal-mine", 0, 0), ("road", 1, 0), ("road", 2, 0), ("heavy-industry", 3, 0)],
        );
        assert_eq!(build_pools(&world, &catalog).len(), 1);

        if let Some(road) = world.construction_at_mut(2, 0) {
            road.bulldoze();
        }
        assert!(build_pools(&world, &catalog).is_empty());
    }
}
