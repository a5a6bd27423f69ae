//! LinCity Sim - headless runner
//!
//! Lays out a small demo town through the request queue, runs it for a
//! number of ticks and prints the resulting economy and statistics.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use lincity_sim::city::catalog::ConstructionCatalog;
use lincity_sim::economy::Statistics;
use lincity_sim::simulation::snapshot::EconomySnapshot;
use lincity_sim::{Result, SimulationConfig, Simulation};

/// Headless city economy runner
#[derive(Parser, Debug)]
#[command(name = "lincity-sim")]
#[command(about = "Run the city economy simulation without a client")]
struct Args {
    /// Simulation settings (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Construction catalog (TOML); built-in groups when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Ticks to run
    #[arg(long, default_value_t = 1200)]
    ticks: u64,

    /// Fire RNG seed, overrides the config value
    #[arg(long)]
    seed: Option<u64>,

    /// Enable random fires
    #[arg(long)]
    fire: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    ticks: u64,
    rejected_requests: usize,
    fires: usize,
    economy: EconomySnapshot,
    statistics: Statistics,
}

/// Demo layout: one road spine with producers above and housing below
const DEMO_TOWN: &[(&str, i32, i32)] = &[
    ("coal-mine", 2, 4),
    ("coal-power", 4, 4),
    ("substation", 6, 4),
    ("organic-farm", 8, 4),
    ("water-well", 10, 4),
    ("light-industry", 12, 4),
    ("market", 14, 4),
    ("solar-power", 16, 4),
    ("residence-ll", 2, 6),
    ("residence-ml", 4, 6),
    ("residence-hl", 6, 6),
    ("residence-lh", 8, 6),
    ("residence-mh", 10, 6),
    ("residence-hh", 12, 6),
    ("organic-farm", 14, 6),
    ("water-well", 16, 6),
];

fn build_demo_town(sim: &mut Simulation) -> Result<()> {
    for x in 1..=17 {
        sim.submit_build_request_by_key("road", x, 5)?;
    }
    for &(key, x, y) in DEMO_TOWN {
        sim.submit_build_request_by_key(key, x, y)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lincity_sim=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.fire_seed = seed;
    }
    config.fire_enabled |= args.fire;
    // The demo town only pays for itself after a few months
    config.charge_construction_costs = false;

    let catalog = match &args.catalog {
        Some(path) => ConstructionCatalog::load_from_toml(path)?,
        None => ConstructionCatalog::with_defaults(),
    };
    tracing::info!("Loaded {} construction groups", catalog.len());

    let mut sim = Simulation::with_catalog(config, catalog)?;
    build_demo_town(&mut sim)?;

    let mut rejected = 0;
    let mut fires = 0;
    for _ in 0..args.ticks {
        let report = sim.tick();
        rejected += report.requests.iter().filter(|o| o.is_rejected()).count();
        fires += report.fires.len();
        if let Some(month) = report.month {
            tracing::debug!(
                "Month {}/{}: money {}, population {}",
                month.month,
                month.year,
                month.money,
                month.population
            );
        }
    }

    let result = RunResult {
        ticks: sim.total_time(),
        rejected_requests: rejected,
        fires,
        economy: sim.economy_snapshot(),
        statistics: sim.statistics().clone(),
    };

    if args.format == "json" {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode result: {}", e),
        }
    } else {
        print_text(&result);
    }
    Ok(())
}

fn print_text(result: &RunResult) {
    let economy = &result.economy;
    let stats = &result.statistics;
    println!("=== {} ticks (year {}, month {}) ===", result.ticks, economy.year, economy.month);
    println!("Money:        {}", economy.money);
    println!("Income:       {}", economy.total_income);
    println!("Expenses:     {}", economy.total_expense);
    println!("Population:   {} / {}", stats.population, stats.housing_capacity);
    println!("Tech level:   {}", economy.tech_level);
    println!("Unemployment: {:.1}%", economy.unemployment_rate * 100.0);
    println!(
        "Buildings:    {} ({} operational, {} wrecks)",
        stats.total_buildings, stats.operational, stats.wrecks
    );
    println!(
        "Power:        {} generated, {} delivered",
        stats.power_generated, stats.power_delivered
    );
    println!("Pollution:    {}", stats.total_pollution);
    println!("Fires:        {}", result.fires);
    println!("Rejected:     {}", result.rejected_requests);
}
