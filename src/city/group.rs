//! Construction groups - immutable building type descriptors
//!
//! A group carries the economic parameters of a building type (cost, fire
//! chance, tech level, range) together with its commodity rules and a
//! declarative `Behavior` that drives the per-tick update.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::city::commodity::{CommodityKind, CommodityRule, CommodityTable};
use crate::city::construction::Construction;
use crate::city::recipe::Recipe;
use crate::core::types::{ConstructionId, GroupId, TilePos};

/// Storage per rule is this many ticks of flow
pub const MAX_LOAD_TICKS: u32 = 100;

/// Broad building category, used by statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupCategory {
    Residence,
    Power,
    Industry,
    Commerce,
    Utility,
    Transport,
}

impl GroupCategory {
    pub const ALL: [GroupCategory; 6] = [
        GroupCategory::Residence,
        GroupCategory::Power,
        GroupCategory::Industry,
        GroupCategory::Commerce,
        GroupCategory::Utility,
        GroupCategory::Transport,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for GroupCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residence" => Ok(GroupCategory::Residence),
            "power" => Ok(GroupCategory::Power),
            "industry" => Ok(GroupCategory::Industry),
            "commerce" => Ok(GroupCategory::Commerce),
            "utility" => Ok(GroupCategory::Utility),
            "transport" => Ok(GroupCategory::Transport),
            _ => Err(s.to_string()),
        }
    }
}

/// What a construction of this group does each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Fixed all-or-nothing recipe (power plants, industry, farms)
    Recipe(Recipe),
    /// Population-scaled recipe; population grows when supplied
    Residence { max_population: u32, demand: Recipe },
    /// Carrier tile (road, power line); connectivity only
    Transport,
    /// Lossy high to low voltage converter and transport node
    Substation { capacity: u32, efficiency_percent: u32 },
    /// Buffer that buys and sells every commodity it has a rule for
    Market { throughput: u32 },
}

impl Behavior {
    /// Nodes of the transport network
    pub fn is_transport_node(&self) -> bool {
        matches!(self, Behavior::Transport | Behavior::Substation { .. })
    }

    /// Pure carriers never hold stock or exchange commodities
    pub fn is_carrier(&self) -> bool {
        matches!(self, Behavior::Transport)
    }

    pub fn max_population(&self) -> u32 {
        match self {
            Behavior::Residence { max_population, .. } => *max_population,
            _ => 0,
        }
    }

    /// Lovolt produced when a substation converts its full capacity
    fn substation_output(capacity: u32, efficiency_percent: u32) -> u32 {
        (capacity as u64 * efficiency_percent as u64 / 100) as u32
    }

    /// Rules implied by the behaviour: inputs are taken, outputs given,
    /// each stored for `MAX_LOAD_TICKS` ticks of flow. `None` when a flow
    /// amount is too large to store.
    pub fn default_rules(&self) -> Option<CommodityTable<CommodityRule>> {
        let mut rules: CommodityTable<CommodityRule> = CommodityTable::default();
        match self {
            Behavior::Recipe(recipe) => recipe_rules(recipe, &mut rules)?,
            Behavior::Residence { demand, .. } => recipe_rules(demand, &mut rules)?,
            Behavior::Substation {
                capacity,
                efficiency_percent,
            } => {
                rules[CommodityKind::HiVolt] = CommodityRule::taker(max_load(*capacity)?);
                rules[CommodityKind::LoVolt] = CommodityRule::giver(max_load(
                    Self::substation_output(*capacity, *efficiency_percent),
                )?);
            }
            Behavior::Transport | Behavior::Market { .. } => {}
        }
        Some(rules)
    }
}

/// Storage for `per_tick` units of flow, if it fits
pub fn max_load(per_tick: u32) -> Option<u32> {
    per_tick.checked_mul(MAX_LOAD_TICKS)
}

fn recipe_rules(recipe: &Recipe, rules: &mut CommodityTable<CommodityRule>) -> Option<()> {
    for &(kind, amount) in &recipe.inputs {
        rules[kind] = CommodityRule::taker(max_load(amount)?);
    }
    for &(kind, amount) in &recipe.outputs {
        rules[kind] = CommodityRule::giver(max_load(amount)?);
    }
    Some(())
}

/// Per-tick exchange limits of a construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_consumption: CommodityTable<u32>,
    pub max_production: CommodityTable<u32>,
}

/// Immutable building type descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionGroup {
    /// Index in the owning catalog, assigned on registration
    pub id: GroupId,
    /// Registry key, e.g. "coal-power"
    pub key: String,
    pub name: String,
    pub category: GroupCategory,
    pub behavior: Behavior,
    /// Footprint edge length in tiles
    pub size: u32,
    /// ARGB
    pub colour: u32,
    pub cost: i64,
    pub cost_mul: i64,
    pub bul_cost: i64,
    /// Chance in ten thousand to burn at each monthly fire check
    pub fire_chance: u32,
    /// Minimum tech level to build
    pub tech: u32,
    /// Chebyshev reach for range-linked exchange; 0 = adjacency only
    pub range: u32,
    /// Excluded from credit purchases
    pub no_credit: bool,
    /// Pollution emitted per operational tick
    pub pollution: u32,
    pub rules: CommodityTable<CommodityRule>,
}

impl ConstructionGroup {
    /// New group with rules derived from its behaviour and neutral parameters.
    /// A behaviour whose flow overflows storage gets no rules and is refused
    /// by the catalog.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        category: GroupCategory,
        behavior: Behavior,
    ) -> Self {
        let rules = behavior.default_rules().unwrap_or_default();
        Self {
            id: GroupId(0),
            key: key.into(),
            name: name.into(),
            category,
            behavior,
            size: 1,
            colour: 0xFFFF_FFFF,
            cost: 0,
            cost_mul: 1,
            bul_cost: 0,
            fire_chance: 0,
            tech: 0,
            range: 0,
            no_credit: false,
            pollution: 0,
            rules,
        }
    }

    pub fn with_cost(mut self, cost: i64, cost_mul: i64) -> Self {
        self.cost = cost;
        self.cost_mul = cost_mul;
        self
    }

    pub fn with_bulldoze_cost(mut self, bul_cost: i64) -> Self {
        self.bul_cost = bul_cost;
        self
    }

    pub fn with_fire_chance(mut self, fire_chance: u32) -> Self {
        self.fire_chance = fire_chance;
        self
    }

    pub fn with_tech(mut self, tech: u32) -> Self {
        self.tech = tech;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_pollution(mut self, pollution: u32) -> Self {
        self.pollution = pollution;
        self
    }

    pub fn with_colour(mut self, colour: u32) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_no_credit(mut self, no_credit: bool) -> Self {
        self.no_credit = no_credit;
        self
    }

    pub fn with_rule(mut self, kind: CommodityKind, rule: CommodityRule) -> Self {
        self.rules[kind] = rule;
        self
    }

    /// Build price
    pub fn cost(&self) -> i64 {
        self.cost * self.cost_mul
    }

    /// Exchange limits for a construction of this group at `population`
    ///
    /// Only residences depend on population.
    pub fn limits(&self, population: u32) -> Limits {
        let mut limits = Limits::default();
        match &self.behavior {
            Behavior::Recipe(recipe) => {
                limits.max_consumption = recipe.input_table();
                limits.max_production = recipe.output_table();
            }
            Behavior::Residence {
                max_population,
                demand,
            } => {
                let scaled = demand.scaled(population.min(*max_population), *max_population);
                limits.max_consumption = scaled.input_table();
                limits.max_production = scaled.output_table();
            }
            Behavior::Substation {
                capacity,
                efficiency_percent,
            } => {
                limits.max_consumption[CommodityKind::HiVolt] = *capacity;
                limits.max_production[CommodityKind::LoVolt] =
                    Behavior::substation_output(*capacity, *efficiency_percent);
            }
            Behavior::Market { throughput } => {
                for (kind, rule) in self.rules.iter() {
                    if rule.take {
                        limits.max_consumption[kind] = *throughput;
                    }
                    if rule.give {
                        limits.max_production[kind] = *throughput;
                    }
                }
            }
            Behavior::Transport => {}
        }
        limits
    }

    /// A fresh construction of this group with its limits pre-populated
    pub fn create_construction(&self, id: ConstructionId, pos: TilePos) -> Construction {
        Construction::new(id, self, pos)
    }
}
