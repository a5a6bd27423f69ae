//! Simulation layer - the tick loop and its phases

pub mod distribution;
pub mod driver;
pub mod fire;
pub mod network;
pub mod production;
pub mod snapshot;

pub use distribution::{distribute, DistributionSummary};
pub use driver::{SimState, Simulation, TickReport};
pub use fire::{FireEvent, FireSystem, FIRE_CHANCE_DIVISOR};
pub use network::{build_pools, Pool};
pub use production::{tick_production, ProductionSummary};
pub use snapshot::{CommodityStock, ConstructionSnapshot, EconomySnapshot};
