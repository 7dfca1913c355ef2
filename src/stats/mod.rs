//! Stats module - Descriptive statistics and correlations

mod calculator;

pub use calculator::{BoxSummary, SeriesStats, StatsCalculator};
