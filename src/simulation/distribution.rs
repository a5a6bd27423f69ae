//! Distribution pass - moves commodities between connected constructions
//!
//! Runs before any construction steps. Offers and requests are read from a
//! consistent snapshot and every transfer is computed before any stock moves.
//!
//! Per pool and commodity:
//! - offer = min(stock, max production), request = min(free room, max consumption)
//! - if supply covers demand, every taker is filled and givers are drawn down
//!   in proportion to their offer
//! - otherwise every giver empties its offer and takers are filled in
//!   proportion to their request
//!
//! Markets give and take the same commodity and only settle the difference:
//! when pure givers cover pure takers, markets absorb the surplus left after
//! every taker is filled; otherwise they release stock to cover the shortfall.

use serde::{Deserialize, Serialize};

use crate::city::catalog::ConstructionCatalog;
use crate::city::commodity::{CommodityKind, CommodityTable};
use crate::simulation::network::{build_pools, Pool};
use crate::world::World;

/// What one distribution pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub pools: usize,
    /// Units moved per commodity
    pub moved: CommodityTable<u64>,
}

impl DistributionSummary {
    pub fn total_moved(&self) -> u64 {
        self.moved.iter().map(|(_, amount)| amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transfer {
    index: usize,
    kind: CommodityKind,
    /// Positive = into the construction
    delta: i64,
}

/// Exchange commodities inside every pool of the current network
pub fn distribute(world: &mut World, catalog: &ConstructionCatalog) -> DistributionSummary {
    let pools = build_pools(world, catalog);
    let mut summary = DistributionSummary {
        pools: pools.len(),
        ..DistributionSummary::default()
    };

    let mut transfers = Vec::new();
    for pool in &pools {
        for kind in CommodityKind::ALL {
            if kind == CommodityKind::None {
                continue;
            }
            let moved = plan_pool(world, catalog, pool, kind, &mut transfers);
            summary.moved[kind] += moved;
        }
    }

    for transfer in &transfers {
        let pos = world.pos_of(transfer.index);
        let Some(construction) = world.construction_at_mut(pos.x, pos.y) else {
            continue;
        };
        if transfer.delta >= 0 {
            construction.add_stock(transfer.kind, transfer.delta as u32);
        } else {
            construction.remove_stock(transfer.kind, transfer.delta.unsigned_abs() as u32);
        }
    }

    tracing::trace!(
        "Distribution: {} pools, {} units moved",
        summary.pools,
        summary.total_moved()
    );
    summary
}

/// Compute the transfers of one commodity inside one pool; returns units moved
fn plan_pool(
    world: &World,
    catalog: &ConstructionCatalog,
    pool: &Pool,
    kind: CommodityKind,
    transfers: &mut Vec<Transfer>,
) -> u64 {
    let mut givers: Vec<(usize, u64)> = Vec::new();
    let mut takers: Vec<(usize, u64)> = Vec::new();
    // (index, offer, request)
    let mut buffers: Vec<(usize, u64, u64)> = Vec::new();

    for &index in &pool.members {
        let tile = &world.tiles()[index];
        let Some(construction) = tile.live_construction() else {
            continue;
        };
        let Some(group) = catalog.get(construction.group) else {
            continue;
        };
        let rule = group.rules[kind];
        let offer = if rule.give { construction.offer(kind) as u64 } else { 0 };
        let request = if rule.take { construction.request(kind) as u64 } else { 0 };
        match (rule.give, rule.take) {
            (true, true) => buffers.push((index, offer, request)),
            (true, false) if offer > 0 => givers.push((index, offer)),
            (false, true) if request > 0 => takers.push((index, request)),
            _ => {}
        }
    }
    givers.sort_by_key(|(index, _)| *index);
    takers.sort_by_key(|(index, _)| *index);
    buffers.sort_by_key(|(index, _, _)| *index);

    let offers: Vec<u64> = givers.iter().map(|(_, a)| *a).collect();
    let requests: Vec<u64> = takers.iter().map(|(_, a)| *a).collect();
    let supply: u64 = offers.iter().sum();
    let demand: u64 = requests.iter().sum();

    let (given, taken, buffered): (Vec<u64>, Vec<u64>, Vec<i64>) = if supply >= demand {
        // Takers are filled first; buffers absorb what is left
        let rooms: Vec<u64> = buffers.iter().map(|b| b.2).collect();
        let absorbed_total = (supply - demand).min(rooms.iter().sum());
        let absorbed = proportional_split(&rooms, absorbed_total, &row_major(rooms.len()));
        let given = proportional_split(&offers, demand + absorbed_total, &largest_first(&offers));
        let buffered = absorbed.iter().map(|&a| a as i64).collect();
        (given, requests, buffered)
    } else {
        // Givers empty out; buffers cover as much of the shortfall as they hold
        let stocks: Vec<u64> = buffers.iter().map(|b| b.1).collect();
        let released_total = (demand - supply).min(stocks.iter().sum());
        let released = proportional_split(&stocks, released_total, &largest_first(&stocks));
        let taken = proportional_split(
            &requests,
            supply + released_total,
            &row_major(requests.len()),
        );
        let buffered = released.iter().map(|&r| -(r as i64)).collect();
        (offers, taken, buffered)
    };

    let mut moved = 0;
    for (&(index, _), &amount) in givers.iter().zip(&given) {
        push_transfer(transfers, index, kind, -(amount as i64));
    }
    for (&(index, _), &amount) in takers.iter().zip(&taken) {
        push_transfer(transfers, index, kind, amount as i64);
        moved += amount;
    }
    for (&(index, _, _), &delta) in buffers.iter().zip(&buffered) {
        push_transfer(transfers, index, kind, delta);
        if delta > 0 {
            moved += delta as u64;
        }
    }
    moved
}

fn push_transfer(transfers: &mut Vec<Transfer>, index: usize, kind: CommodityKind, delta: i64) {
    if delta != 0 {
        transfers.push(Transfer { index, kind, delta });
    }
}

fn row_major(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// Indices by amount descending; inputs are already row-major so ties keep it
fn largest_first(amounts: &[u64]) -> Vec<usize> {
    let mut order = row_major(amounts.len());
    order.sort_by(|&a, &b| amounts[b].cmp(&amounts[a]));
    order
}

/// Split `total` over `amounts` in proportion, rounding down, then hand out
/// the remainder one unit at a time following `order`
///
/// No share exceeds its amount; `total` must not exceed the sum of amounts.
pub fn proportional_split(amounts: &[u64], total: u64, order: &[usize]) -> Vec<u64> {
    let sum: u64 = amounts.iter().sum();
    if sum == 0 {
        return vec![0; amounts.len()];
    }
    let total = total.min(sum);

    let mut shares: Vec<u64> = amounts
        .iter()
        .map(|&a| (a as u128 * total as u128 / sum as u128) as u64)
        .collect();
    let mut remainder = total - shares.iter().sum::<u64>();

    while remainder > 0 {
        let mut progressed = false;
        for &i in order {
            if remainder == 0 {
                break;
            }
            if shares[i] < amounts[i] {
                shares[i] += 1;
                remainder -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    shares
}
