//! Simulation configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. The driver owns its config; there is
//! no global instance.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === WORLD ===
    /// Width of the world grid in tiles
    pub world_width: usize,

    /// Height of the world grid in tiles
    pub world_height: usize,

    // === CLOCK ===
    /// Number of ticks (days) in a month
    ///
    /// Tax collection, tech level updates and fire checks happen once per
    /// month, so this sets the pace of the whole economy.
    pub days_per_month: u64,

    // === ECONOMY ===
    /// Money the city starts with
    pub starting_money: i64,

    /// Income tax in percent of population, collected monthly
    pub tax_rate: u32,

    /// Ceiling for the tech level
    pub tech_level_cap: u32,

    /// Whether build requests are paid for through the economy
    ///
    /// When on, a build that the city cannot afford is rejected.
    pub charge_construction_costs: bool,

    /// Whether build requests require the group's minimum tech level
    pub enforce_tech_level: bool,

    // === ENVIRONMENT ===
    /// Pollution on each tile decays by `pollution / divisor` per tick
    ///
    /// Larger = pollution lingers longer.
    pub pollution_decay_divisor: u32,

    /// Enable monthly fire checks
    pub fire_enabled: bool,

    /// Seed for the fire RNG so that runs are reproducible
    pub fire_seed: u64,

    // === DRIVER ===
    /// Ticks advanced per frame while running
    pub default_speed: u32,

    // === PARALLELIZATION ===
    /// Minimum construction count before updates run on the rayon pool
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    pub parallel_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world_width: 100,
            world_height: 100,

            days_per_month: 100,

            starting_money: 10_000,
            tax_rate: 10,
            tech_level_cap: 100,
            charge_construction_costs: true,
            enforce_tech_level: false,

            pollution_decay_divisor: 64,
            fire_enabled: false,
            fire_seed: 12345,

            default_speed: 1,

            parallel_threshold: 4096,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys take their defaults
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "world size must be non-zero, got {}x{}",
                self.world_width, self.world_height
            )));
        }

        if i32::try_from(self.world_width).is_err() || i32::try_from(self.world_height).is_err() {
            return Err(SimError::InvalidConfig(
                "world size must fit in i32 coordinates".into(),
            ));
        }

        if self.days_per_month == 0 {
            return Err(SimError::InvalidConfig("days_per_month must be positive".into()));
        }

        if self.tax_rate > 100 {
            return Err(SimError::InvalidConfig(format!(
                "tax_rate ({}) is a percentage and must be <= 100",
                self.tax_rate
            )));
        }

        if self.pollution_decay_divisor == 0 {
            return Err(SimError::InvalidConfig(
                "pollution_decay_divisor must be positive".into(),
            ));
        }

        if self.default_speed == 0 {
            return Err(SimError::InvalidConfig("default_speed must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world_width, 100);
        assert_eq!(config.days_per_month, 100);
        assert_eq!(config.starting_money, 10_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::parse_toml(
            r#"
world_width = 32
world_height = 16
tax_rate = 15
"#,
        )
        .expect("Should parse");

        assert_eq!(config.world_width, 32);
        assert_eq!(config.world_height, 16);
        assert_eq!(config.tax_rate, 15);
        assert_eq!(config.days_per_month, 100);
        assert!(!config.fire_enabled);
    }

    #[test]
    fn test_invalid_tax_rate_rejected() {
        let result = SimulationConfig::parse_toml("tax_rate = 250");
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_world_rejected() {
        let config = SimulationConfig {
            world_width: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let result = SimulationConfig::parse_toml("world_width = \"wide\"");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::path::Path::new("data/simulation.toml");
        let config = SimulationConfig::load_from_toml(path)
            .expect("Should load config from data/simulation.toml");
        assert_eq!(config.world_width, 100);
        assert_eq!(config.world_height, 100);
        assert!(config.charge_construction_costs);
    }
}
