//! Stockpile - per-construction commodity storage
//!
//! Amounts never exceed the capacity set from the owning group's rules.

use serde::{Deserialize, Serialize};

use crate::city::commodity::{CommodityKind, CommodityRule, CommodityTable};

/// A stockpile holding commodities for one construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stockpile {
    amounts: CommodityTable<u32>,
    capacities: CommodityTable<u32>,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty stockpile with capacities taken from a rule table
    pub fn with_rules(rules: &CommodityTable<CommodityRule>) -> Self {
        let mut stockpile = Self::new();
        for (kind, rule) in rules.iter() {
            stockpile.capacities[kind] = rule.max_load;
        }
        stockpile
    }

    /// Set capacity for a commodity, discarding anything above it
    pub fn set_capacity(&mut self, kind: CommodityKind, capacity: u32) {
        self.capacities[kind] = capacity;
        self.amounts[kind] = self.amounts[kind].min(capacity);
    }

    /// Get current amount of a commodity
    #[inline]
    pub fn get(&self, kind: CommodityKind) -> u32 {
        self.amounts[kind]
    }

    /// Get capacity for a commodity
    #[inline]
    pub fn capacity(&self, kind: CommodityKind) -> u32 {
        self.capacities[kind]
    }

    /// Free space left for a commodity
    #[inline]
    pub fn room(&self, kind: CommodityKind) -> u32 {
        self.capacities[kind].saturating_sub(self.amounts[kind])
    }

    /// Overwrite an amount, clamped to capacity; returns the stored amount
    pub fn set(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        let stored = amount.min(self.capacities[kind]);
        self.amounts[kind] = stored;
        stored
    }

    /// Try to add commodities, returns amount actually added
    pub fn add(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        let added = amount.min(self.room(kind));
        self.amounts[kind] += added;
        added
    }

    /// Try to remove commodities, returns amount actually removed
    pub fn remove(&mut self, kind: CommodityKind, amount: u32) -> u32 {
        let removed = amount.min(self.amounts[kind]);
        self.amounts[kind] -= removed;
        removed
    }

    /// Check if the stockpile holds enough of every required commodity
    pub fn has_materials(&self, requirements: &[(CommodityKind, u32)]) -> bool {
        requirements
            .iter()
            .all(|(kind, amount)| self.get(*kind) >= *amount)
    }

    /// Consume all requirements, or nothing; returns true if consumed
    pub fn consume_materials(&mut self, requirements: &[(CommodityKind, u32)]) -> bool {
        if !self.has_materials(requirements) {
            return false;
        }
        for (kind, amount) in requirements {
            self.remove(*kind, *amount);
        }
        true
    }

    pub fn amounts(&self) -> &CommodityTable<u32> {
        &self.amounts
    }
}
