//! Read-only views handed to external collaborators

use serde::Serialize;

use crate::city::commodity::CommodityKind;
use crate::city::construction::Construction;
use crate::city::group::ConstructionGroup;
use crate::core::types::{ConstructionId, GroupId};
use crate::economy::Economy;

/// Stock of one commodity the construction handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommodityStock {
    pub kind: CommodityKind,
    pub amount: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructionSnapshot {
    pub id: ConstructionId,
    pub group: GroupId,
    pub key: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub bulldozed: bool,
    pub operational: bool,
    pub power_output: u32,
    pub pollution: u32,
    pub population: u32,
    pub max_population: u32,
    /// Only commodities with an active rule
    pub stock: Vec<CommodityStock>,
}

impl ConstructionSnapshot {
    pub fn new(construction: &Construction, group: &ConstructionGroup) -> Self {
        let stock = group
            .rules
            .iter()
            .filter(|(_, rule)| rule.is_active())
            .map(|(kind, _)| CommodityStock {
                kind,
                amount: construction.stock(kind),
                capacity: construction.stockpile().capacity(kind),
            })
            .collect();

        Self {
            id: construction.id,
            group: construction.group,
            key: group.key.clone(),
            name: group.name.clone(),
            x: construction.pos.x,
            y: construction.pos.y,
            bulldozed: construction.bulldozed,
            operational: construction.operational,
            power_output: construction.power_output,
            pollution: construction.pollution,
            population: construction.population,
            max_population: construction.max_population,
            stock,
        }
    }

    pub fn amount(&self, kind: CommodityKind) -> u32 {
        self.stock
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.amount)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EconomySnapshot {
    pub money: i64,
    pub tax_rate: u32,
    pub population: u32,
    pub tech_level: u32,
    pub unemployment_rate: f32,
    pub month: u32,
    pub year: u32,
    pub total_income: i64,
    pub total_expense: i64,
}

impl From<&Economy> for EconomySnapshot {
    fn from(economy: &Economy) -> Self {
        Self {
            money: economy.money,
            tax_rate: economy.tax_rate,
            population: economy.population,
            tech_level: economy.tech_level,
            unemployment_rate: economy.unemployment_rate,
            month: economy.month,
            year: economy.year,
            total_income: economy.total_income,
            total_expense: economy.total_expense,
        }
    }
}
