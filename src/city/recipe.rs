//! Production recipes - what a construction consumes and produces per tick
//!
//! Recipes are all-or-nothing: either every input is available and the whole
//! recipe runs, or nothing is consumed and nothing is produced.

use serde::{Deserialize, Serialize};

use crate::city::commodity::{CommodityKind, CommodityTable};

/// A per-tick production recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Commodities consumed per operational tick
    pub inputs: Vec<(CommodityKind, u32)>,
    /// Commodities produced per operational tick
    pub outputs: Vec<(CommodityKind, u32)>,
}

impl Recipe {
    pub fn new(inputs: Vec<(CommodityKind, u32)>, outputs: Vec<(CommodityKind, u32)>) -> Self {
        Self { inputs, outputs }
    }

    /// Scale every amount by `numerator / denominator`, rounding down
    ///
    /// Used by residences, whose demand follows their population.
    /// A zero denominator yields an empty-amount recipe.
    pub fn scaled(&self, numerator: u32, denominator: u32) -> Recipe {
        let scale = |amounts: &[(CommodityKind, u32)]| {
            amounts
                .iter()
                .map(|&(kind, amount)| {
                    let scaled = if denominator == 0 {
                        0
                    } else {
                        (amount as u64 * numerator as u64 / denominator as u64) as u32
                    };
                    (kind, scaled)
                })
                .collect()
        };
        Recipe {
            inputs: scale(&self.inputs),
            outputs: scale(&self.outputs),
        }
    }

    /// Amount of `kind` consumed per tick
    pub fn input(&self, kind: CommodityKind) -> u32 {
        sum_of(&self.inputs, kind)
    }

    /// Amount of `kind` produced per tick
    pub fn output(&self, kind: CommodityKind) -> u32 {
        sum_of(&self.outputs, kind)
    }

    /// Inputs as a per-commodity table
    pub fn input_table(&self) -> CommodityTable<u32> {
        to_table(&self.inputs)
    }

    /// Outputs as a per-commodity table
    pub fn output_table(&self) -> CommodityTable<u32> {
        to_table(&self.outputs)
    }

    /// Electricity produced per operational tick
    pub fn power_output(&self) -> u32 {
        self.outputs
            .iter()
            .filter(|(kind, _)| kind.is_electricity())
            .map(|(_, amount)| amount)
            .sum()
    }
}

fn sum_of(amounts: &[(CommodityKind, u32)], kind: CommodityKind) -> u32 {
    amounts
        .iter()
        .filter(|(k, _)| *k == kind)
        .map(|(_, amount)| amount)
        .sum()
}

fn to_table(amounts: &[(CommodityKind, u32)]) -> CommodityTable<u32> {
    let mut table = CommodityTable::default();
    for &(kind, amount) in amounts {
        table[kind] += amount;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residence_demand() -> Recipe {
        Recipe::new(
            vec![
                (CommodityKind::Food, 10),
                (CommodityKind::Goods, 5),
                (CommodityKind::LoVolt, 8),
                (CommodityKind::Water, 12),
            ],
            vec![(CommodityKind::Labor, 15), (CommodityKind::Waste, 7)],
        )
    }

    #[test]
    fn test_recipe_scaled_rounds_down() {
        let scaled = residence_demand().scaled(10, 50);
        assert_eq!(scaled.input(CommodityKind::Food), 2);
        assert_eq!(scaled.input(CommodityKind::Goods), 1);
        // 8 * 10 / 50 = 1.6
        assert_eq!(scaled.input(CommodityKind::LoVolt), 1);
        // 12 * 10 / 50 = 2.4
        assert_eq!(scaled.input(CommodityKind::Water), 2);
        assert_eq!(scaled.output(CommodityKind::Labor), 3);
        assert_eq!(scaled.output(CommodityKind::Waste), 1);
    }

    #[test]
    fn test_recipe_scaled_to_zero() {
        let scaled = residence_demand().scaled(0, 50);
        assert!(scaled.inputs.iter().all(|(_, amount)| *amount == 0));
        assert!(scaled.outputs.iter().all(|(_, amount)| *amount == 0));

        let degenerate = residence_demand().scaled(10, 0);
        assert_eq!(degenerate.input(CommodityKind::Food), 0);
    }

    #[test]
    fn test_recipe_tables() {
        let coal_plant = Recipe::new(
            vec![(CommodityKind::Coal, 10)],
            vec![(CommodityKind::HiVolt, 100), (CommodityKind::Waste, 20)],
        );
        let inputs = coal_plant.input_table();
        let outputs = coal_plant.output_table();
        assert_eq!(inputs[CommodityKind::Coal], 10);
        assert_eq!(outputs[CommodityKind::HiVolt], 100);
        assert_eq!(outputs[CommodityKind::Coal], 0);
        assert_eq!(coal_plant.power_output(), 100);
    }

    #[test]
    fn test_recipe_without_electricity_has_no_power_output() {
        assert_eq!(residence_demand().power_output(), 0);
    }
}
