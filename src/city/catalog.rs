//! Construction catalog - registry of every construction group
//!
//! The catalog is owned by the simulation and shared by reference; groups are
//! immutable once registered. Built-in LinCity groups come from
//! `with_defaults`, alternative sets can be loaded from TOML.

use ahash::AHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::city::commodity::{CommodityKind, CommodityRule};
use crate::city::group::{max_load, Behavior, ConstructionGroup, GroupCategory, MAX_LOAD_TICKS};
use crate::city::recipe::Recipe;
use crate::core::types::GroupId;

/// Error type for catalog loading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogLoadError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid commodity: {0}")]
    InvalidCommodity(String),

    #[error("Invalid behavior: {0}")]
    InvalidBehavior(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Duplicate group key: {0}")]
    DuplicateKey(String),

    #[error("Invalid parameter for '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Catalog is full")]
    TooManyGroups,
}

/// Catalog of all available construction groups
#[derive(Debug, Clone, Default)]
pub struct ConstructionCatalog {
    groups: Vec<ConstructionGroup>,
    by_key: AHashMap<String, GroupId>,
}

impl ConstructionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The LinCity building set
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for group in default_groups() {
            // Keys below are unique and well under the id limit
            let _ = catalog.add(group);
        }
        catalog
    }

    /// Register a group, assigning its id
    pub fn add(&mut self, mut group: ConstructionGroup) -> Result<GroupId, CatalogLoadError> {
        validate_group(&group)?;
        if self.by_key.contains_key(&group.key) {
            return Err(CatalogLoadError::DuplicateKey(group.key));
        }
        let id = u16::try_from(self.groups.len())
            .map(GroupId)
            .map_err(|_| CatalogLoadError::TooManyGroups)?;

        group.id = id;
        self.by_key.insert(group.key.clone(), id);
        self.groups.push(group);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: GroupId) -> Option<&ConstructionGroup> {
        self.groups.get(id.index())
    }

    pub fn by_key(&self, key: &str) -> Option<&ConstructionGroup> {
        self.id_of(key).and_then(|id| self.get(id))
    }

    pub fn id_of(&self, key: &str) -> Option<GroupId> {
        self.by_key.get(key).copied()
    }

    /// Get all groups for a category
    pub fn in_category(
        &self,
        category: GroupCategory,
    ) -> impl Iterator<Item = &ConstructionGroup> {
        self.groups.iter().filter(move |g| g.category == category)
    }

    pub fn all(&self) -> &[ConstructionGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, CatalogLoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, CatalogLoadError> {
        let toml_data: TomlCatalog =
            toml::from_str(content).map_err(|e| CatalogLoadError::ParseError(e.to_string()))?;

        let mut catalog = Self::new();
        for group in toml_data.groups {
            catalog.add(group.into_group()?)?;
        }
        Ok(catalog)
    }
}

fn validate_group(group: &ConstructionGroup) -> Result<(), CatalogLoadError> {
    let invalid = |reason: &str| CatalogLoadError::InvalidParameter {
        key: group.key.clone(),
        reason: reason.to_string(),
    };

    if group.key.is_empty() {
        return Err(invalid("key must not be empty"));
    }
    if group.cost < 0 || group.cost_mul < 0 || group.bul_cost < 0 {
        return Err(invalid("costs must not be negative"));
    }
    if group.behavior.default_rules().is_none() {
        return Err(invalid("flow amounts overflow commodity storage"));
    }
    match &group.behavior {
        Behavior::Residence { max_population, .. } if *max_population == 0 => {
            Err(invalid("residence max_population must be positive"))
        }
        Behavior::Substation {
            efficiency_percent, ..
        } if *efficiency_percent == 0 || *efficiency_percent > 100 => {
            Err(invalid("substation efficiency_percent must be in 1..=100"))
        }
        Behavior::Market { throughput } if *throughput == 0 => {
            Err(invalid("market throughput must be positive"))
        }
        Behavior::Market { throughput } if max_load(*throughput).is_none() => {
            Err(invalid("market throughput overflows commodity storage"))
        }
        _ => Ok(()),
    }
}

fn recipe(inputs: &[(CommodityKind, u32)], outputs: &[(CommodityKind, u32)]) -> Recipe {
    Recipe::new(inputs.to_vec(), outputs.to_vec())
}

fn residence(
    key: &str,
    name: &str,
    max_population: u32,
    cost: i64,
    level: u32,
    fire_chance: u32,
    size: u32,
) -> ConstructionGroup {
    use CommodityKind::*;
    let demand = recipe(
        &[(Food, 10), (Goods, 5), (LoVolt, 8), (Water, 12)],
        &[(Labor, 15), (Waste, 7)],
    );
    ConstructionGroup::new(
        key,
        name,
        GroupCategory::Residence,
        Behavior::Residence {
            max_population,
            demand,
        },
    )
    .with_cost(cost, level as i64)
    .with_bulldoze_cost(level as i64)
    .with_fire_chance(fire_chance)
    .with_tech((level - 1) * 10)
    .with_size(size)
    .with_colour(0xFF80_C0FF)
}

fn default_groups() -> Vec<ConstructionGroup> {
    use CommodityKind::*;

    let market_commodities = [Food, Goods, Coal, Ore, Steel];
    let market_throughput = 500;
    let mut market = ConstructionGroup::new(
        "market",
        "Market",
        GroupCategory::Commerce,
        Behavior::Market {
            throughput: market_throughput,
        },
    )
    .with_cost(100, 2)
    .with_bulldoze_cost(2)
    .with_fire_chance(20)
    .with_range(15)
    .with_size(2)
    .with_colour(0xFFFF_C000);
    for kind in market_commodities {
        market = market.with_rule(
            kind,
            CommodityRule::buffer(market_throughput * MAX_LOAD_TICKS),
        );
    }

    vec![
        residence("residence-ll", "Low Density Low Tech Residence", 50, 100, 1, 10, 1),
        residence("residence-ml", "Medium Density Low Tech Residence", 100, 200, 2, 20, 2),
        residence("residence-hl", "High Density Low Tech Residence", 200, 300, 3, 30, 3),
        residence("residence-lh", "Low Density High Tech Residence", 75, 400, 4, 5, 1),
        residence("residence-mh", "Medium Density High Tech Residence", 150, 500, 5, 10, 2),
        residence("residence-hh", "High Density High Tech Residence", 300, 600, 6, 15, 3),
        ConstructionGroup::new(
            "coal-power",
            "Coal Power Station",
            GroupCategory::Power,
            Behavior::Recipe(recipe(&[(Coal, 10)], &[(HiVolt, 100), (Waste, 20)])),
        )
        .with_cost(1000, 5)
        .with_bulldoze_cost(5)
        .with_fire_chance(50)
        .with_tech(10)
        .with_size(4)
        .with_pollution(20)
        .with_colour(0xFF40_4040),
        ConstructionGroup::new(
            "solar-power",
            "Solar Power Station",
            GroupCategory::Power,
            Behavior::Recipe(recipe(&[], &[(HiVolt, 50)])),
        )
        .with_cost(2000, 10)
        .with_bulldoze_cost(10)
        .with_fire_chance(10)
        .with_tech(50)
        .with_size(4)
        .with_colour(0xFFFF_FF80),
        ConstructionGroup::new(
            "wind-power",
            "Wind Power Station",
            GroupCategory::Power,
            Behavior::Recipe(recipe(&[], &[(HiVolt, 25)])),
        )
        .with_cost(500, 5)
        .with_bulldoze_cost(5)
        .with_fire_chance(20)
        .with_tech(30)
        .with_size(2)
        .with_colour(0xFFC0_E0FF),
        ConstructionGroup::new(
            "substation",
            "Substation",
            GroupCategory::Power,
            Behavior::Substation {
                capacity: 200,
                efficiency_percent: 90,
            },
        )
        .with_cost(200, 2)
        .with_bulldoze_cost(2)
        .with_fire_chance(30)
        .with_tech(20)
        .with_range(10)
        .with_size(2)
        .with_colour(0xFFFF_8000),
        ConstructionGroup::new(
            "power-line",
            "Power Line",
            GroupCategory::Transport,
            Behavior::Transport,
        )
        .with_cost(50, 1)
        .with_bulldoze_cost(1)
        .with_fire_chance(5)
        .with_tech(10)
        .with_colour(0xFFFF_0080),
        ConstructionGroup::new("road", "Road", GroupCategory::Transport, Behavior::Transport)
            .with_cost(10, 1)
            .with_bulldoze_cost(1)
            .with_colour(0xFF80_8080),
        ConstructionGroup::new(
            "light-industry",
            "Light Industry",
            GroupCategory::Industry,
            Behavior::Recipe(recipe(&[(Labor, 20)], &[(Goods, 15), (Waste, 10)])),
        )
        .with_cost(300, 3)
        .with_bulldoze_cost(3)
        .with_fire_chance(30)
        .with_tech(10)
        .with_size(2)
        .with_pollution(5)
        .with_colour(0xFFFF_FF00),
        ConstructionGroup::new(
            "heavy-industry",
            "Heavy Industry",
            GroupCategory::Industry,
            Behavior::Recipe(recipe(
                &[(Labor, 40), (Ore, 20), (Coal, 15)],
                &[(Steel, 10), (Waste, 25)],
            )),
        )
        .with_cost(1000, 5)
        .with_bulldoze_cost(5)
        .with_fire_chance(50)
        .with_tech(30)
        .with_size(4)
        .with_pollution(15)
        .with_colour(0xFF00_00FF),
        market,
        ConstructionGroup::new(
            "organic-farm",
            "Organic Farm",
            GroupCategory::Utility,
            Behavior::Recipe(recipe(&[], &[(Food, 50)])),
        )
        .with_cost(100, 1)
        .with_bulldoze_cost(1)
        .with_fire_chance(20)
        .with_size(4)
        .with_colour(0xFF00_FF00),
        ConstructionGroup::new(
            "water-well",
            "Water Well",
            GroupCategory::Utility,
            Behavior::Recipe(recipe(&[], &[(Water, 50)])),
        )
        .with_cost(50, 1)
        .with_bulldoze_cost(1)
        .with_size(2)
        .with_colour(0xFF00_FFFF),
        ConstructionGroup::new(
            "coal-mine",
            "Coal Mine",
            GroupCategory::Industry,
            Behavior::Recipe(recipe(&[(Labor, 10)], &[(Coal, 40)])),
        )
        .with_cost(250, 2)
        .with_bulldoze_cost(2)
        .with_fire_chance(40)
        .with_size(4)
        .with_pollution(5)
        .with_colour(0xFF00_0000),
        ConstructionGroup::new(
            "ore-mine",
            "Ore Mine",
            GroupCategory::Industry,
            Behavior::Recipe(recipe(&[(Labor, 10)], &[(Ore, 40)])),
        )
        .with_cost(250, 2)
        .with_bulldoze_cost(2)
        .with_fire_chance(10)
        .with_size(4)
        .with_pollution(5)
        .with_colour(0xFF80_8080),
        ConstructionGroup::new(
            "recycling-centre",
            "Recycling Centre",
            GroupCategory::Utility,
            Behavior::Recipe(recipe(&[(Labor, 5), (Waste, 20)], &[(Ore, 5)])),
        )
        .with_cost(500, 2)
        .with_bulldoze_cost(2)
        .with_fire_chance(10)
        .with_tech(20)
        .with_size(2)
        .with_colour(0xFF80_0080),
    ]
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    groups: Vec<TomlGroup>,
}

/// TOML representation of a single group
#[derive(Debug, Deserialize)]
struct TomlGroup {
    key: String,
    name: String,
    category: String,
    behavior: String,
    #[serde(default = "one")]
    size: u32,
    #[serde(default = "white")]
    colour: u32,
    #[serde(default)]
    cost: i64,
    #[serde(default = "one_i64")]
    cost_mul: i64,
    #[serde(default)]
    bul_cost: i64,
    #[serde(default)]
    fire_chance: u32,
    #[serde(default)]
    tech: u32,
    #[serde(default)]
    range: u32,
    #[serde(default)]
    no_credit: bool,
    #[serde(default)]
    pollution: u32,
    #[serde(default)]
    inputs: Vec<TomlAmount>,
    #[serde(default)]
    outputs: Vec<TomlAmount>,
    max_population: Option<u32>,
    capacity: Option<u32>,
    efficiency_percent: Option<u32>,
    throughput: Option<u32>,
    /// Commodities a market trades
    #[serde(default)]
    commodities: Vec<String>,
    /// Explicit rule overrides
    #[serde(default)]
    rules: Vec<TomlRule>,
}

/// TOML representation of a commodity amount
#[derive(Debug, Deserialize)]
struct TomlAmount {
    commodity: String,
    amount: u32,
}

/// TOML representation of a rule override
#[derive(Debug, Deserialize)]
struct TomlRule {
    commodity: String,
    max_load: u32,
    #[serde(default)]
    take: bool,
    #[serde(default)]
    give: bool,
}

fn one() -> u32 {
    1
}

fn one_i64() -> i64 {
    1
}

fn white() -> u32 {
    0xFFFF_FFFF
}

fn parse_commodity(name: &str) -> Result<CommodityKind, CatalogLoadError> {
    name.parse()
        .map_err(|_| CatalogLoadError::InvalidCommodity(name.to_string()))
}

impl TomlAmount {
    fn to_amount(&self) -> Result<(CommodityKind, u32), CatalogLoadError> {
        Ok((parse_commodity(&self.commodity)?, self.amount))
    }
}

impl TomlGroup {
    fn missing(&self, field: &str) -> CatalogLoadError {
        CatalogLoadError::InvalidParameter {
            key: self.key.clone(),
            reason: format!("{} behavior requires '{}'", self.behavior, field),
        }
    }

    fn into_group(self) -> Result<ConstructionGroup, CatalogLoadError> {
        let category: GroupCategory = self
            .category
            .parse()
            .map_err(CatalogLoadError::InvalidCategory)?;

        let inputs = self
            .inputs
            .iter()
            .map(TomlAmount::to_amount)
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = self
            .outputs
            .iter()
            .map(TomlAmount::to_amount)
            .collect::<Result<Vec<_>, _>>()?;
        let recipe = Recipe::new(inputs, outputs);

        let behavior = match self.behavior.to_lowercase().as_str() {
            "recipe" => Behavior::Recipe(recipe),
            "residence" => Behavior::Residence {
                max_population: self
                    .max_population
                    .ok_or_else(|| self.missing("max_population"))?,
                demand: recipe,
            },
            "transport" => Behavior::Transport,
            "substation" => Behavior::Substation {
                capacity: self.capacity.ok_or_else(|| self.missing("capacity"))?,
                efficiency_percent: self
                    .efficiency_percent
                    .ok_or_else(|| self.missing("efficiency_percent"))?,
            },
            "market" => Behavior::Market {
                throughput: self.throughput.ok_or_else(|| self.missing("throughput"))?,
            },
            _ => return Err(CatalogLoadError::InvalidBehavior(self.behavior)),
        };

        let mut group = ConstructionGroup::new(self.key, self.name, category, behavior)
            .with_size(self.size)
            .with_colour(self.colour)
            .with_cost(self.cost, self.cost_mul)
            .with_bulldoze_cost(self.bul_cost)
            .with_fire_chance(self.fire_chance)
            .with_tech(self.tech)
            .with_range(self.range)
            .with_no_credit(self.no_credit)
            .with_pollution(self.pollution);

        if let Behavior::Market { throughput } = group.behavior {
            let storage = max_load(throughput).ok_or_else(|| CatalogLoadError::InvalidParameter {
                key: group.key.clone(),
                reason: "market throughput overflows commodity storage".to_string(),
            })?;
            for name in &self.commodities {
                let kind = parse_commodity(name)?;
                group.rules[kind] = CommodityRule::buffer(storage);
            }
        }
        for rule in self.rules {
            let kind = parse_commodity(&rule.commodity)?;
            group.rules[kind] = CommodityRule::new(rule.max_load, rule.take, rule.give);
        }
        Ok(group)
    }
}
