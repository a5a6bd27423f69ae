//! Calendar for the simulation clock
//!
//! One tick is one simulated day. Months are a fixed number of days long and
//! a year is always twelve months. The economy keeps its own month/year
//! counters; the calendar only answers "is this tick a boundary".

use serde::{Deserialize, Serialize};

/// Number of months in a simulated year
pub const MONTHS_PER_YEAR: u64 = 12;

/// Calendar tracks elapsed days and where they fall in the month/year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    tick: u64,
    days_per_month: u64,
}

impl Calendar {
    pub fn new(days_per_month: u64) -> Self {
        Self {
            tick: 0,
            days_per_month: days_per_month.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn days_per_month(&self) -> u64 {
        self.days_per_month
    }

    pub fn days_per_year(&self) -> u64 {
        self.days_per_month * MONTHS_PER_YEAR
    }

    /// Day within the current month (0-based)
    pub fn day_of_month(&self) -> u64 {
        self.tick % self.days_per_month
    }

    /// Whole months elapsed since the start
    pub fn months_elapsed(&self) -> u64 {
        self.tick / self.days_per_month
    }

    /// True when the current tick closes a month
    pub fn is_month_boundary(&self) -> bool {
        self.tick > 0 && self.tick % self.days_per_month == 0
    }

    /// True when the current tick closes a year
    pub fn is_year_boundary(&self) -> bool {
        self.tick > 0 && self.tick % self.days_per_year() == 0
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(100)
    }
}
