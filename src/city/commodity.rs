//! Commodities - the closed set of tradeable resources
//!
//! Every per-commodity quantity in the simulation is stored in a
//! `CommodityTable`, a fixed-size array indexed by `CommodityKind`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Kind of commodity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommodityKind {
    None = 0,
    Food = 1,
    Labor = 2,
    Goods = 3,
    Coal = 4,
    Ore = 5,
    Steel = 6,
    Waste = 7,
    HiVolt = 8,
    LoVolt = 9,
    Water = 10,
}

impl CommodityKind {
    pub const COUNT: usize = 11;

    pub const ALL: [CommodityKind; CommodityKind::COUNT] = [
        CommodityKind::None,
        CommodityKind::Food,
        CommodityKind::Labor,
        CommodityKind::Goods,
        CommodityKind::Coal,
        CommodityKind::Ore,
        CommodityKind::Steel,
        CommodityKind::Waste,
        CommodityKind::HiVolt,
        CommodityKind::LoVolt,
        CommodityKind::Water,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CommodityKind::None => "None",
            CommodityKind::Food => "Food",
            CommodityKind::Labor => "Labor",
            CommodityKind::Goods => "Goods",
            CommodityKind::Coal => "Coal",
            CommodityKind::Ore => "Ore",
            CommodityKind::Steel => "Steel",
            CommodityKind::Waste => "Waste",
            CommodityKind::HiVolt => "High Voltage",
            CommodityKind::LoVolt => "Low Voltage",
            CommodityKind::Water => "Water",
        }
    }

    /// ARGB colour used by map overlays
    pub fn colour(self) -> u32 {
        match self {
            CommodityKind::None => 0xFFCC_CCCC,
            CommodityKind::Food => 0xFF00_FF00,
            CommodityKind::Labor => 0xFFFF_0000,
            CommodityKind::Goods => 0xFFFF_FF00,
            CommodityKind::Coal => 0xFF00_0000,
            CommodityKind::Ore => 0xFF80_8080,
            CommodityKind::Steel => 0xFF00_00FF,
            CommodityKind::Waste => 0xFF80_0080,
            CommodityKind::HiVolt => 0xFFFF_0080,
            CommodityKind::LoVolt => 0xFFFF_8000,
            CommodityKind::Water => 0xFF00_FFFF,
        }
    }

    /// Electricity grades, reported as a construction's power output
    pub fn is_electricity(self) -> bool {
        matches!(self, CommodityKind::HiVolt | CommodityKind::LoVolt)
    }
}

impl std::fmt::Display for CommodityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a data file names a commodity that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommodity(pub String);

impl FromStr for CommodityKind {
    type Err = UnknownCommodity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "none" => CommodityKind::None,
            "food" => CommodityKind::Food,
            "labor" | "labour" | "jobs" => CommodityKind::Labor,
            "goods" => CommodityKind::Goods,
            "coal" => CommodityKind::Coal,
            "ore" => CommodityKind::Ore,
            "steel" => CommodityKind::Steel,
            "waste" => CommodityKind::Waste,
            "hivolt" | "high_voltage" => CommodityKind::HiVolt,
            "lovolt" | "low_voltage" => CommodityKind::LoVolt,
            "water" => CommodityKind::Water,
            _ => return Err(UnknownCommodity(s.to_string())),
        };
        Ok(kind)
    }
}

/// Exchange rule for one commodity on one construction group
///
/// `max_load` is the storage ceiling; by convention it is 100x the
/// per-tick flow so that stores hold a hundred days of throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommodityRule {
    pub max_load: u32,
    pub take: bool,
    pub give: bool,
}

impl CommodityRule {
    pub fn new(max_load: u32, take: bool, give: bool) -> Self {
        Self { max_load, take, give }
    }

    /// Storage the construction may only draw from the network
    pub fn taker(max_load: u32) -> Self {
        Self::new(max_load, true, false)
    }

    /// Storage the construction may only supply to the network
    pub fn giver(max_load: u32) -> Self {
        Self::new(max_load, false, true)
    }

    /// Storage that both buys and sells (markets)
    pub fn buffer(max_load: u32) -> Self {
        Self::new(max_load, true, true)
    }

    /// A rule with both flags off means the commodity is not handled at all
    pub fn is_active(&self) -> bool {
        self.take || self.give
    }
}

/// Fixed-size per-commodity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityTable<T>([T; CommodityKind::COUNT]);

impl<T: Copy + Default> Default for CommodityTable<T> {
    fn default() -> Self {
        Self([T::default(); CommodityKind::COUNT])
    }
}

impl<T: Copy> CommodityTable<T> {
    pub fn iter(&self) -> impl Iterator<Item = (CommodityKind, &T)> + '_ {
        CommodityKind::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<CommodityKind> for CommodityTable<T> {
    type Output = T;

    #[inline]
    fn index(&self, kind: CommodityKind) -> &T {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<CommodityKind> for CommodityTable<T> {
    #[inline]
    fn index_mut(&mut self, kind: CommodityKind) -> &mut T {
        &mut self.0[kind.index()]
    }
}
