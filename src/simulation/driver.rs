//! Simulation driver - owns all state and advances it one tick at a time
//!
//! Tick order:
//! 1. drain the request queue
//! 2. distribution pass
//! 3. step every live construction (row-major, rayon above the threshold)
//! 4. advance the calendar; at month end collect taxes, update the tech level
//!    and run the fire check
//! 5. rescan statistics and feed population and jobs back into the economy

use serde::Serialize;

use crate::city::catalog::ConstructionCatalog;
use crate::city::request::{
    ConstructionHandle, ConstructionRequest, RequestOutcome, RequestPolicy, RequestQueue,
};
use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, Tick};
use crate::economy::{Economy, MonthlyReport, Statistics, YearlyReport};
use crate::simulation::distribution::{distribute, DistributionSummary};
use crate::simulation::fire::{FireEvent, FireSystem};
use crate::simulation::production::{tick_production, ProductionSummary};
use crate::simulation::snapshot::{ConstructionSnapshot, EconomySnapshot};
use crate::world::tile::MapTile;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimState {
    Running,
    Paused,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick count after this tick
    pub tick: Tick,
    pub requests: Vec<RequestOutcome>,
    pub distribution: DistributionSummary,
    pub production: ProductionSummary,
    /// Set when this tick closed a month
    pub month: Option<MonthlyReport>,
    /// Set when this tick closed a year
    pub year: Option<YearlyReport>,
    pub fires: Vec<FireEvent>,
}

/// The city simulation
pub struct Simulation {
    config: SimulationConfig,
    catalog: ConstructionCatalog,
    world: World,
    queue: RequestQueue,
    economy: Economy,
    statistics: Statistics,
    calendar: Calendar,
    fire: FireSystem,
    state: SimState,
    speed: u32,
}

impl Simulation {
    /// New simulation with the built-in construction catalog
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_catalog(config, ConstructionCatalog::with_defaults())
    }

    pub fn with_catalog(config: SimulationConfig, catalog: ConstructionCatalog) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::from_config(&config),
            economy: Economy::from_config(&config),
            calendar: Calendar::new(config.days_per_month),
            fire: FireSystem::new(config.fire_seed),
            speed: config.default_speed.max(1),
            queue: RequestQueue::new(),
            statistics: Statistics::new(),
            state: SimState::Paused,
            catalog,
            config,
        })
    }

    // === DRIVE ===

    /// Advance exactly one tick, regardless of the paused state
    pub fn tick(&mut self) -> TickReport {
        let requests = self.queue.drain(
            &mut self.world,
            &self.catalog,
            &mut self.economy,
            RequestPolicy::from(&self.config),
        );

        let distribution = distribute(&mut self.world, &self.catalog);

        let production = tick_production(
            &mut self.world,
            &self.catalog,
            self.config.pollution_decay_divisor,
            self.config.parallel_threshold,
        );

        self.calendar.advance();
        let mut month = None;
        let mut year = None;
        let mut fires = Vec::new();
        if self.calendar.is_month_boundary() {
            month = Some(self.economy.do_sim_step());
            self.economy.update_tech_level(self.config.tech_level_cap);
            if self.economy.month == 0 {
                year = self.economy.yearly_reports().last().copied();
            }
            if self.config.fire_enabled {
                fires = self.fire.check(&mut self.world, &self.catalog);
            }
        }

        self.statistics.update(&self.world, &self.catalog);
        self.economy.population = self.statistics.population;
        self.economy
            .update_unemployment_rate(self.statistics.available_jobs);

        tracing::debug!(
            "Tick {}: {} requests, {} moved, {}/{} operational",
            self.calendar.current_tick(),
            requests.len(),
            distribution.total_moved(),
            production.operational,
            production.stepped
        );

        TickReport {
            tick: self.calendar.current_tick(),
            requests,
            distribution,
            production,
            month,
            year,
            fires,
        }
    }

    /// Advance `speed` ticks while running; nothing while paused
    pub fn run_frame(&mut self) -> Vec<TickReport> {
        match self.state {
            SimState::Running => (0..self.speed).map(|_| self.tick()).collect(),
            SimState::Paused => Vec::new(),
        }
    }

    pub fn set_speed(&mut self, ticks_per_frame: u32) {
        self.speed = ticks_per_frame.max(1);
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn pause(&mut self) {
        self.state = SimState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = SimState::Running;
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SimState::Running => SimState::Paused,
            SimState::Paused => SimState::Running,
        };
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Ticks elapsed since the start
    pub fn total_time(&self) -> Tick {
        self.calendar.current_tick()
    }

    // === WRITES ===

    pub fn submit_build_request(&mut self, group: GroupId, x: i32, y: i32) {
        self.queue.submit(ConstructionRequest::Build { group, x, y });
    }

    /// Queue a build by group key; fails only for unknown keys
    pub fn submit_build_request_by_key(&mut self, key: &str, x: i32, y: i32) -> Result<GroupId> {
        let group = self
            .catalog
            .id_of(key)
            .ok_or_else(|| SimError::UnknownGroup(key.to_string()))?;
        self.submit_build_request(group, x, y);
        Ok(group)
    }

    pub fn submit_bulldoze_request(&mut self, x: i32, y: i32) {
        self.queue.submit(ConstructionRequest::Bulldoze { x, y });
    }

    pub fn submit_bulldoze_construction(&mut self, handle: ConstructionHandle) {
        self.queue
            .submit(ConstructionRequest::BulldozeConstruction(handle));
    }

    pub fn pending_requests(&self) -> usize {
        self.queue.len()
    }

    // === READS ===

    pub fn tile(&self, x: i32, y: i32) -> Result<&MapTile> {
        self.world.tile(x, y)
    }

    /// Snapshot of the construction on a tile, bulldozed ones included
    pub fn construction_snapshot(&self, x: i32, y: i32) -> Result<Option<ConstructionSnapshot>> {
        let tile = self.world.tile(x, y)?;
        Ok(tile.construction.as_ref().and_then(|construction| {
            self.catalog
                .get(construction.group)
                .map(|group| ConstructionSnapshot::new(construction, group))
        }))
    }

    /// Handle for bulldozing the construction currently on a tile
    pub fn construction_handle(&self, x: i32, y: i32) -> Option<ConstructionHandle> {
        self.world
            .live_construction_at(x, y)
            .map(|c| ConstructionHandle { id: c.id, x, y })
    }

    pub fn economy_snapshot(&self) -> EconomySnapshot {
        EconomySnapshot::from(&self.economy)
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn catalog(&self) -> &ConstructionCatalog {
        &self.catalog
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            world_width: 16,
            world_height: 16,
            days_per_month: 5,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_starts_paused() {
        let mut sim = Simulation::new(small_config()).expect("valid config");
        assert_eq!(sim.state(), SimState::Paused);
        assert_eq!(sim.total_time(), 0);
        assert!(sim.run_frame().is_empty());
        assert_eq!(sim.total_time(), 0);
    }

    #[test]
    fn test_tick_advances_even_when_paused() {
        let mut sim = Simulation::new(small_config()).expect("valid config");
        let report = sim.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(sim.total_time(), 1);
    }

    #[test]
    fn test_run_frame_uses_speed() {
        let mut sim = Simulation::new(small_config()).expect("valid config");
        sim.resume();
        sim.set_speed(3);
        assert_eq!(sim.run_frame().len(), 3);
        assert_eq!(sim.total_time(), 3);

        sim.set_speed(0);
        assert_eq!(sim.speed(), 1);

        sim.toggle_pause();
        assert!(!sim.is_running());
        assert!(sim.run_frame().is_empty());
    }

    #[test]
    fn test_month_boundary_reported() {
        let mut sim = Simulation::new(small_config()).expect("valid config");
        let reports: Vec<_> = (0..5).map(|_| sim.tick()).collect();
        assert!(reports[..4].iter().all(|r| r.month.is_none()));
        assert!(reports[4].month.is_some());
        assert_eq!(sim.economy().month, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            days_per_month: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(Simulation::new(config), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut sim = Simulation::new(small_config()).expect("valid config");
        assert!(matches!(
            sim.submit_build_request_by_key("castle", 0, 0),
            Err(SimError::UnknownGroup(_))
        ));
        assert_eq!(sim.pending_requests(), 0);
    }
}
