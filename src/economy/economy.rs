//! City finances, population and the economic calendar
//!
//! The economy keeps its own month/year counters; the driver calls
//! `do_sim_step` once per simulated month.

use serde::{Deserialize, Serialize};

use crate::core::calendar::MONTHS_PER_YEAR;
use crate::core::config::SimulationConfig;

/// Ceiling for the tech level unless configured otherwise
pub const TECH_LEVEL_CAP: u32 = 100;

/// Population needed per tech level point
pub const POPULATION_PER_TECH_LEVEL: u32 = 100;

/// Closing figures of one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: u32,
    /// Month that just closed (0-based)
    pub month: u32,
    pub money: i64,
    pub population: u32,
    pub tax_income: i64,
    /// Everything earned this month, taxes included
    pub income: i64,
    pub expenses: i64,
}

/// Closing figures of one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: u32,
    pub money: i64,
    pub population: u32,
    pub income: i64,
    pub expenses: i64,
}

/// City-wide economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub money: i64,
    /// Percent of population collected monthly
    pub tax_rate: u32,
    /// Fraction of residents without a job, 0.0..=1.0
    pub unemployment_rate: f32,
    pub population: u32,
    pub tech_level: u32,
    /// 0..=11
    pub month: u32,
    pub year: u32,
    pub total_income: i64,
    pub total_expense: i64,
    month_income: i64,
    month_expense: i64,
    year_income: i64,
    year_expense: i64,
    monthly_reports: Vec<MonthlyReport>,
    yearly_reports: Vec<YearlyReport>,
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(10_000, 10)
    }
}

impl Economy {
    pub fn new(money: i64, tax_rate: u32) -> Self {
        Self {
            money,
            tax_rate,
            unemployment_rate: 0.0,
            population: 0,
            tech_level: 0,
            month: 0,
            year: 0,
            total_income: 0,
            total_expense: 0,
            month_income: 0,
            month_expense: 0,
            year_income: 0,
            year_expense: 0,
            monthly_reports: Vec::new(),
            yearly_reports: Vec::new(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.starting_money, config.tax_rate)
    }

    /// Tax due this month: `population * tax_rate / 100`, rounded down
    pub fn tax_due(&self) -> i64 {
        self.population as i64 * self.tax_rate as i64 / 100
    }

    /// Close the current month: collect taxes, record the report and advance
    /// the calendar, rolling the year after month 11
    pub fn do_sim_step(&mut self) -> MonthlyReport {
        let tax_income = self.tax_due();
        self.add_money(tax_income);

        let report = MonthlyReport {
            year: self.year,
            month: self.month,
            money: self.money,
            population: self.population,
            tax_income,
            income: self.month_income,
            expenses: self.month_expense,
        };
        self.monthly_reports.push(report);
        self.year_income += self.month_income;
        self.year_expense += self.month_expense;
        self.month_income = 0;
        self.month_expense = 0;

        self.month += 1;
        if self.month >= MONTHS_PER_YEAR as u32 {
            self.yearly_reports.push(YearlyReport {
                year: self.year,
                money: self.money,
                population: self.population,
                income: self.year_income,
                expenses: self.year_expense,
            });
            tracing::info!(
                "Year {} closed: money {}, population {}",
                self.year,
                self.money,
                self.population
            );
            self.year_income = 0;
            self.year_expense = 0;
            self.month = 0;
            self.year += 1;
        }
        report
    }

    /// Debit `amount`; returns false and changes nothing if the city cannot pay
    pub fn spend_money(&mut self, amount: i64) -> bool {
        if amount < 0 || self.money < amount {
            return false;
        }
        self.money -= amount;
        self.total_expense += amount;
        self.month_expense += amount;
        true
    }

    pub fn add_money(&mut self, amount: i64) {
        self.money += amount;
        self.total_income += amount;
        self.month_income += amount;
    }

    /// One tech point per hundred residents, capped
    pub fn update_tech_level(&mut self, cap: u32) {
        self.tech_level = cap.min(self.population / POPULATION_PER_TECH_LEVEL);
    }

    /// Share of residents not covered by `available_jobs`
    pub fn update_unemployment_rate(&mut self, available_jobs: u32) {
        if self.population == 0 {
            self.unemployment_rate = 0.0;
            return;
        }
        let working = self.population.min(available_jobs);
        self.unemployment_rate = 1.0 - working as f32 / self.population as f32;
    }

    pub fn monthly_reports(&self) -> &[MonthlyReport] {
        &self.monthly_reports
    }

    pub fn yearly_reports(&self) -> &[YearlyReport] {
        &self.yearly_reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let economy = Economy::default();
        assert_eq!(economy.money, 10_000);
        assert_eq!(economy.tax_rate, 10);
        assert_eq!(economy.month, 0);
        assert_eq!(economy.year, 0);
    }

    #[test]
    fn test_tax_collection() {
        let mut economy = Economy::new(0, 10);
        economy.population = 1234;
        let report = economy.do_sim_step();
        assert_eq!(report.tax_income, 123);
        assert_eq!(economy.money, 123);
        assert_eq!(economy.total_income, 123);
        assert_eq!(economy.month, 1);
    }

    #[test]
    fn test_month_rolls_into_year() {
        let mut economy = Economy::default();
        for _ in 0..11 {
            economy.do_sim_step();
        }
        assert_eq!(economy.month, 11);
        assert!(economy.yearly_reports().is_empty());

        economy.do_sim_step();
        assert_eq!(economy.month, 0);
        assert_eq!(economy.year, 1);
        assert_eq!(economy.monthly_reports().len(), 12);
        assert_eq!(economy.yearly_reports().len(), 1);
        assert_eq!(economy.yearly_reports()[0].year, 0);
    }

    #[test]
    fn test_spend_money() {
        let mut economy = Economy::new(100, 10);
        assert!(!economy.spend_money(101));
        assert_eq!(economy.money, 100);
        assert_eq!(economy.total_expense, 0);

        assert!(economy.spend_money(100));
        assert_eq!(economy.money, 0);
        assert_eq!(economy.total_expense, 100);
        assert!(!economy.spend_money(-5));
    }

    #[test]
    fn test_month_report_tracks_expenses() {
        let mut economy = Economy::new(1000, 10);
        economy.spend_money(300);
        economy.add_money(50);
        let report = economy.do_sim_step();
        assert_eq!(report.expenses, 300);
        assert_eq!(report.income, 50);

        let next = economy.do_sim_step();
        assert_eq!(next.expenses, 0);
    }

    #[test]
    fn test_tech_level() {
        let mut economy = Economy::default();
        economy.population = 2550;
        economy.update_tech_level(TECH_LEVEL_CAP);
        assert_eq!(economy.tech_level, 25);

        economy.population = 50_000;
        economy.update_tech_level(TECH_LEVEL_CAP);
        assert_eq!(economy.tech_level, 100);
    }

    #[test]
    fn test_unemployment_rate() {
        let mut economy = Economy::default();
        economy.update_unemployment_rate(10);
        assert_eq!(economy.unemployment_rate, 0.0);

        economy.population = 200;
        economy.update_unemployment_rate(150);
        assert!((economy.unemployment_rate - 0.25).abs() < 1e-6);

        economy.update_unemployment_rate(1000);
        assert_eq!(economy.unemployment_rate, 0.0);
    }
}
