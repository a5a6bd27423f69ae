//! Integration tests for the economy and the simulation clock
//!
//! - Monthly tax collection and report history
//! - Year rollover
//! - Spending and insufficient funds
//! - Fire runs reproducibly from its seed

use lincity_sim::economy::{Economy, TECH_LEVEL_CAP};
use lincity_sim::{Simulation, SimulationConfig};

fn clock_config(days_per_month: u64) -> SimulationConfig {
    SimulationConfig {
        world_width: 16,
        world_height: 16,
        days_per_month,
        charge_construction_costs: false,
        ..SimulationConfig::default()
    }
}

// ============================================================================
// Economy API
// ============================================================================

#[test]
fn test_monthly_tax_and_rollover() {
    let mut economy = Economy::new(0, 10);
    economy.population = 1234;

    let mut reports = Vec::new();
    for _ in 0..12 {
        reports.push(economy.do_sim_step());
    }

    // floor(1234 * 10 / 100) = 123 per month
    assert!(reports.iter().all(|r| r.tax_income == 123));
    assert_eq!(reports[11].month, 11);
    assert_eq!(reports[11].year, 0);
    assert_eq!(economy.month, 0);
    assert_eq!(economy.year, 1);
    assert_eq!(economy.money, 123 * 12);
    assert_eq!(economy.total_income, 123 * 12);

    let years = economy.yearly_reports();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0].income, 123 * 12);
    assert_eq!(economy.monthly_reports().len(), 12);
}

#[test]
fn test_spend_money_guards_balance() {
    let mut economy = Economy::new(100, 10);

    assert!(!economy.spend_money(101));
    assert_eq!(economy.money, 100);
    assert_eq!(economy.total_expense, 0);

    assert!(economy.spend_money(100));
    assert_eq!(economy.money, 0);
    assert_eq!(economy.total_expense, 100);

    economy.add_money(40);
    assert_eq!(economy.money, 40);
    assert_eq!(economy.total_income, 40);
}

#[test]
fn test_tech_level_and_unemployment() {
    let mut economy = Economy::default();
    economy.population = 25_000;
    economy.update_tech_level(TECH_LEVEL_CAP);
    assert_eq!(economy.tech_level, TECH_LEVEL_CAP);

    economy.population = 450;
    economy.update_tech_level(TECH_LEVEL_CAP);
    assert_eq!(economy.tech_level, 4);

    economy.update_unemployment_rate(360);
    assert!((economy.unemployment_rate - 0.2).abs() < 1e-6);

    economy.population = 0;
    economy.update_unemployment_rate(10);
    assert_eq!(economy.unemployment_rate, 0.0);
}

// ============================================================================
// Driver clock
// ============================================================================

#[test]
fn test_driver_closes_months_and_years() {
    let mut sim = Simulation::new(clock_config(2)).expect("config");

    let reports: Vec<_> = (0..24).map(|_| sim.tick()).collect();

    let months = reports.iter().filter(|r| r.month.is_some()).count();
    assert_eq!(months, 12);
    assert!(reports[..23].iter().all(|r| r.year.is_none()));
    let year = reports[23].year.expect("year closed on the last tick");
    assert_eq!(year.year, 0);

    let economy = sim.economy_snapshot();
    assert_eq!(economy.month, 0);
    assert_eq!(economy.year, 1);
    assert_eq!(sim.total_time(), 24);
}

#[test]
fn test_driver_collects_tax_from_residents() {
    let mut sim = Simulation::new(clock_config(30)).expect("config");
    sim.submit_build_request_by_key("residence-hh", 1, 1).expect("residence");
    sim.submit_build_request_by_key("residence-hh", 3, 3).expect("residence");

    for _ in 0..30 {
        sim.tick();
    }

    let economy = sim.economy();
    assert!(economy.population > 0);
    assert!(economy.total_income > 0);
    assert_eq!(
        economy.money,
        sim.config().starting_money + economy.total_income - economy.total_expense
    );
    // No workplaces: everyone is out of work
    assert_eq!(economy.unemployment_rate, 1.0);
}

// ============================================================================
// Fire
// ============================================================================

fn burning_town(seed: u64) -> Vec<(i32, i32)> {
    let config = SimulationConfig {
        fire_enabled: true,
        fire_seed: seed,
        ..clock_config(1)
    };
    let mut sim = Simulation::new(config).expect("config");
    for y in 0..16 {
        for x in 0..16 {
            sim.submit_build_request_by_key("coal-power", x, y).expect("plant");
        }
    }
    let mut burnt = Vec::new();
    for _ in 0..24 {
        burnt.extend(sim.tick().fires.iter().map(|f| (f.x, f.y)));
    }
    assert_eq!(sim.statistics().wrecks as usize, burnt.len());
    burnt
}

#[test]
fn test_fire_is_reproducible() {
    let first = burning_town(99);
    assert!(!first.is_empty());
    assert_eq!(first, burning_town(99));
}

#[test]
fn test_fire_disabled_by_default() {
    let mut sim = Simulation::new(clock_config(1)).expect("config");
    sim.submit_build_request_by_key("coal-power", 0, 0).expect("plant");
    for _ in 0..120 {
        assert!(sim.tick().fires.is_empty());
    }
    assert_eq!(sim.statistics().wrecks, 0);
}
