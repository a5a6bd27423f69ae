//! Construction - one placed building and its per-tick update
//!
//! All building types share this record. What a construction does each tick
//! is decided by its group's `Behavior`; the record itself only holds state.

use serde::{Deserialize, Serialize};

use crate::city::commodity::CommodityKind;
use crate::city::group::{Behavior, ConstructionGroup, Limits};
use crate::city::recipe::Recipe;
use crate::city::stockpile::Stockpile;
use crate::core::types::{ConstructionId, GroupId, TilePos};

/// Result of one `do_sim_step`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub operational: bool,
    /// Waste that did not fit in storage; lands on the tile as pollution
    pub waste_spill: u32,
}

impl StepOutcome {
    fn idle() -> Self {
        Self::default()
    }

    fn running() -> Self {
        Self {
            operational: true,
            waste_spill: 0,
        }
    }
}

/// A placed construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construction {
    pub id: ConstructionId,
    pub group: GroupId,
    pub pos: TilePos,
    /// Terminal; a bulldozed construction stays until overwritten
    pub bulldozed: bool,
    pub operational: bool,
    /// Electricity produced in the last step
    pub power_output: u32,
    /// Pollution emitted in the last step
    pub pollution: u32,
    /// Residents (residences only)
    pub population: u32,
    pub max_population: u32,
    stock: Stockpile,
    limits: Limits,
}

impl Construction {
    pub fn new(id: ConstructionId, group: &ConstructionGroup, pos: TilePos) -> Self {
        Self {
            id,
            group: group.id,
            pos,
            bulldozed: false,
            operational: false,
            power_output: 0,
            pollution: 0,
            population: 0,
            max_population: group.behavior.max_population(),
            stock: Stockpile::with_rules(&group.rules),
            limits: group.limits(0),
        }
    }

    pub fn stock(&self, kind: CommodityKind) -> u32 {
        self.stock.get(kind)
    }

    pub fn stockpile(&self) -> &Stockpile {
        &self.stock
    }

    /// Overwrite a stock level, clamped to capacity; returns the stored amount
    pub fn set_stock(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        self.stock.set(kind, amount)
    }

    pub fn add_stock(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        self.stock.add(kind, amount)
    }

    pub fn remove_stock(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        self.stock.remove(kind, amount)
    }

    pub fn max_consumption(&self, kind: CommodityKind) -> u32 {
        self.limits.max_consumption[kind]
    }

    pub fn max_production(&self, kind: CommodityKind) -> u32 {
        self.limits.max_production[kind]
    }

    /// Amount this construction can hand to the network this tick
    pub fn offer(&self, kind: CommodityKind) -> u32 {
        self.stock.get(kind).min(self.limits.max_production[kind])
    }

    /// Amount this construction wants from the network this tick
    pub fn request(&self, kind: CommodityKind) -> u32 {
        self.stock.room(kind).min(self.limits.max_consumption[kind])
    }

    /// Set residents, clamped to the group maximum, and refresh limits
    pub fn set_population(&mut self, group: &ConstructionGroup, population: u32) {
        self.population = population.min(self.max_population);
        self.limits = group.limits(self.population);
    }

    pub fn bulldoze(&mut self) {
        self.bulldozed = true;
        self.operational = false;
        self.power_output = 0;
        self.pollution = 0;
    }

    pub fn is_live(&self) -> bool {
        !self.bulldozed
    }

    /// Run one tick of this construction
    ///
    /// Bulldozed constructions never change.
    pub fn do_sim_step(&mut self, group: &ConstructionGroup) -> StepOutcome {
        if self.bulldozed {
            return StepOutcome::idle();
        }

        let outcome = match &group.behavior {
            Behavior::Recipe(recipe) => self.run_recipe(recipe),
            Behavior::Residence {
                max_population,
                demand,
            } => self.step_residence(group, *max_population, demand),
            Behavior::Substation {
                capacity,
                efficiency_percent,
            } => self.step_substation(*capacity, *efficiency_percent),
            Behavior::Transport | Behavior::Market { .. } => {
                self.power_output = 0;
                StepOutcome::running()
            }
        };

        self.operational = outcome.operational;
        self.pollution = if outcome.operational { group.pollution } else { 0 };
        outcome
    }

    fn run_recipe(&mut self, recipe: &Recipe) -> StepOutcome {
        if !self.stock.consume_materials(&recipe.inputs) {
            self.power_output = 0;
            return StepOutcome::idle();
        }

        let mut outcome = StepOutcome::running();
        let mut power = 0;
        for &(kind, amount) in &recipe.outputs {
            let added = self.stock.add(kind, amount);
            if kind == CommodityKind::Waste {
                outcome.waste_spill += amount - added;
            }
            if kind.is_electricity() {
                power += added;
            }
        }
        self.power_output = power;
        outcome
    }

    fn step_residence(
        &mut self,
        group: &ConstructionGroup,
        max_population: u32,
        demand: &Recipe,
    ) -> StepOutcome {
        let population = self.population.min(max_population);
        let outcome = self.run_recipe(&demand.scaled(population, max_population));

        let next = if outcome.operational {
            (population + 1).min(max_population)
        } else {
            population.saturating_sub(1)
        };
        self.set_population(group, next);
        outcome
    }

    fn step_substation(&mut self, capacity: u32, efficiency_percent: u32) -> StepOutcome {
        let available = self.stock.get(CommodityKind::HiVolt) as u64;
        let room = self.stock.room(CommodityKind::LoVolt) as u64;
        let efficiency = efficiency_percent as u64;
        let room_limited = if efficiency == 0 {
            capacity as u64
        } else {
            room * 100 / efficiency
        };

        let used = available.min(capacity as u64).min(room_limited);
        if used == 0 {
            self.power_output = 0;
            return StepOutcome::idle();
        }

        let produced = (used * efficiency / 100) as u32;
        self.stock.remove(CommodityKind::HiVolt, used as u32);
        let added = self.stock.add(CommodityKind::LoVolt, produced);
        self.power_output = added;
        StepOutcome::running()
    }
}
