//! Charts module - Chart data preparation and rendering

mod plotter;

pub use plotter::{
    line_segments, ChartData, ChartPlotter, DistributionData, ScatterData, TimeSeries,
    GOLD_COLOR, SILVER_COLOR,
};
