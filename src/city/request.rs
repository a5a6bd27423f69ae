//! Construction requests - the only way constructions enter or leave the map
//!
//! External code submits requests; the driver drains the queue at the start
//! of a tick so the grid is never mutated mid-update. Rejected requests are
//! dropped, reported in the returned outcomes and logged at debug level.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::city::catalog::ConstructionCatalog;
use crate::core::config::SimulationConfig;
use crate::core::types::{ConstructionId, GroupId};
use crate::economy::Economy;
use crate::world::World;

/// Refers to one specific construction, not just a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructionHandle {
    pub id: ConstructionId,
    pub x: i32,
    pub y: i32,
}

/// A pending change to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionRequest {
    Build { group: GroupId, x: i32, y: i32 },
    Bulldoze { x: i32, y: i32 },
    BulldozeConstruction(ConstructionHandle),
}

/// Why a request was dropped
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("tile is outside the world")]
    OutOfBounds,
    #[error("tile already holds a live construction")]
    Occupied,
    #[error("no live construction to bulldoze")]
    NothingToBulldoze,
    #[error("unknown construction group")]
    UnknownGroup,
    #[error("not enough money")]
    InsufficientFunds,
    #[error("tech level too low")]
    TechLevelTooLow,
    #[error("construction handle no longer matches the tile")]
    StaleHandle,
}

/// What happened to one drained request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestOutcome {
    Built {
        id: ConstructionId,
        group: GroupId,
        x: i32,
        y: i32,
    },
    Bulldozed {
        id: ConstructionId,
        x: i32,
        y: i32,
    },
    Rejected {
        request: ConstructionRequest,
        reason: RejectReason,
    },
}

impl RequestOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, RequestOutcome::Rejected { .. })
    }
}

/// Checks applied to build requests beyond bounds and occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    pub charge_construction_costs: bool,
    pub enforce_tech_level: bool,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            charge_construction_costs: true,
            enforce_tech_level: false,
        }
    }
}

impl From<&SimulationConfig> for RequestPolicy {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            charge_construction_costs: config.charge_construction_costs,
            enforce_tech_level: config.enforce_tech_level,
        }
    }
}

/// FIFO of pending construction requests
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    pending: VecDeque<ConstructionRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, request: ConstructionRequest) {
        self.pending.push_back(request);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending request in submission order, leaving the queue empty
    pub fn drain(
        &mut self,
        world: &mut World,
        catalog: &ConstructionCatalog,
        economy: &mut Economy,
        policy: RequestPolicy,
    ) -> Vec<RequestOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        while let Some(request) = self.pending.pop_front() {
            let result = match request {
                ConstructionRequest::Build { group, x, y } => {
                    build(world, catalog, economy, policy, group, x, y)
                }
                ConstructionRequest::Bulldoze { x, y } => bulldoze(world, x, y, None),
                ConstructionRequest::BulldozeConstruction(handle) => {
                    bulldoze(world, handle.x, handle.y, Some(handle.id))
                }
            };

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(reason) => {
                    tracing::debug!("Rejected {:?}: {}", request, reason);
                    RequestOutcome::Rejected { request, reason }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn build(
    world: &mut World,
    catalog: &ConstructionCatalog,
    economy: &mut Economy,
    policy: RequestPolicy,
    group_id: GroupId,
    x: i32,
    y: i32,
) -> Result<RequestOutcome, RejectReason> {
    let tile = world.tile(x, y).map_err(|_| RejectReason::OutOfBounds)?;
    if tile.live_construction().is_some() {
        return Err(RejectReason::Occupied);
    }
    let group = catalog.get(group_id).ok_or(RejectReason::UnknownGroup)?;

    if policy.enforce_tech_level && economy.tech_level < group.tech {
        return Err(RejectReason::TechLevelTooLow);
    }
    if policy.charge_construction_costs && !economy.spend_money(group.cost()) {
        return Err(RejectReason::InsufficientFunds);
    }

    let id = world
        .place_construction(group, x, y)
        .map_err(|_| RejectReason::OutOfBounds)?;
    Ok(RequestOutcome::Built {
        id,
        group: group_id,
        x,
        y,
    })
}

fn bulldoze(
    world: &mut World,
    x: i32,
    y: i32,
    expected: Option<ConstructionId>,
) -> Result<RequestOutcome, RejectReason> {
    let tile = world.tile_mut(x, y).map_err(|_| RejectReason::OutOfBounds)?;
    let construction = match tile.construction.as_mut() {
        Some(c) if c.is_live() => c,
        _ if expected.is_some() => return Err(RejectReason::StaleHandle),
        _ => return Err(RejectReason::NothingToBulldoze),
    };
    if expected.is_some_and(|id| id != construction.id) {
        return Err(RejectReason::StaleHandle);
    }

    construction.bulldoze();
    Ok(RequestOutcome::Bulldozed {
        id: construction.id,
        x,
        y,
    })
}
