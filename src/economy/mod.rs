//! Economy layer - finances and city statistics

pub mod economy;
pub mod statistics;

pub use economy::{Economy, MonthlyReport, YearlyReport, TECH_LEVEL_CAP};
pub use statistics::Statistics;
