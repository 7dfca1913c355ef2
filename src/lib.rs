//! Gold & Silver vs Geopolitical Risk - exploratory data analysis dashboard.
//!
//! The data pipeline loads the historical CSV once per path, normalizes it
//! into a date-ordered [`data::PriceTable`] with derived return, ratio and
//! risk-change columns, and serves year-bounded views of it to the charts.

pub mod charts;
pub mod data;
pub mod gui;
pub mod settings;
pub mod stats;
