//! LinCity Sim - tick-driven city economy simulation core

pub mod city;
pub mod core;
pub mod economy;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::simulation::driver::{SimState, Simulation, TickReport};
