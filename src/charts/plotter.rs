//! Chart Plotter Module
//! Turns a filtered table into chart-ready series and draws them with egui_plot.

use crate::data::schema::*;
use crate::data::{days_to_date, DataProcessor, PriceTable, Result, SERIES, VALUE};
use crate::stats::{SeriesStats, StatsCalculator};
use egui::{Color32, RichText};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};
use polars::prelude::DataType;
use std::collections::HashMap;

pub const GOLD_COLOR: Color32 = Color32::from_rgb(212, 175, 55);
pub const SILVER_COLOR: Color32 = Color32::from_rgb(150, 160, 170);

pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
];

/// One line series; a null value ends the current segment so it renders as a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    /// Points are `[days since epoch, value]`.
    pub segments: Vec<Vec<[f64; 2]>>,
}

/// Paired observations for a scatter plot.
#[derive(Debug, Clone, Default)]
pub struct ScatterData {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
    pub correlation: Option<f64>,
}

/// Values and summary of one return distribution.
#[derive(Debug, Clone)]
pub struct DistributionData {
    pub name: String,
    pub values: Vec<f64>,
    pub stats: SeriesStats,
}

/// Everything the tabs draw for one year cutoff.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub prices: Vec<TimeSeries>,
    pub risk: Vec<TimeSeries>,
    pub risk_vs_gold: ScatterData,
    pub risk_vs_silver: ScatterData,
    pub distributions: Vec<DistributionData>,
}

impl ChartData {
    pub fn from_table(table: &PriceTable) -> Result<Self> {
        let risk_cols: Vec<&str> = RISK_COLUMNS
            .iter()
            .copied()
            .filter(|c| table.has_column(c))
            .collect();

        let gprd_change = table.values(GPRD_PCT_CHANGE)?;
        let gold_change = table.values(GOLD_CHANGE_PCT)?;
        let silver_change = table.values(SILVER_CHANGE_PCT)?;

        let stats = StatsCalculator::compute_all_stats_parallel(
            table,
            &[GOLD_CHANGE_PCT, SILVER_CHANGE_PCT],
        );
        let distributions = [GOLD_CHANGE_PCT, SILVER_CHANGE_PCT]
            .iter()
            .filter_map(|name| {
                stats.get(*name).map(|s| DistributionData {
                    name: name.to_string(),
                    values: StatsCalculator::column_values(table, name),
                    stats: s.clone(),
                })
            })
            .collect();

        Ok(Self {
            prices: Self::time_series(table, &[GOLD_PRICE, SILVER_PRICE])?,
            risk: Self::time_series(table, &risk_cols)?,
            risk_vs_gold: Self::scatter(GPRD_PCT_CHANGE, &gprd_change, GOLD_CHANGE_PCT, &gold_change),
            risk_vs_silver: Self::scatter(
                GPRD_PCT_CHANGE,
                &gprd_change,
                SILVER_CHANGE_PCT,
                &silver_change,
            ),
            distributions,
        })
    }

    /// Build one line series per column from the long-format frame.
    fn time_series(table: &PriceTable, columns: &[&str]) -> Result<Vec<TimeSeries>> {
        let long = DataProcessor::stack_to_long(table, columns)?;
        let days = long.column(DATE)?.cast(&DataType::Int32)?;
        let days = days.as_materialized_series().i32()?;
        let names = long.column(SERIES)?.as_materialized_series().str()?;
        let values = long.column(VALUE)?.as_materialized_series().f64()?;

        let mut by_series: HashMap<&str, Vec<(f64, Option<f64>)>> = HashMap::new();
        for ((day, name), value) in days.into_iter().zip(names).zip(values) {
            if let (Some(day), Some(name)) = (day, name) {
                by_series.entry(name).or_default().push((day as f64, value));
            }
        }

        Ok(columns
            .iter()
            .filter_map(|column| {
                by_series.remove(column).map(|points| TimeSeries {
                    name: column.to_string(),
                    segments: line_segments(points),
                })
            })
            .collect())
    }

    fn scatter(
        x_label: &str,
        x: &[Option<f64>],
        y_label: &str,
        y: &[Option<f64>],
    ) -> ScatterData {
        let points = x
            .iter()
            .zip(y)
            .filter_map(|pair| match pair {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some([*a, *b]),
                _ => None,
            })
            .collect();

        ScatterData {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            points,
            correlation: StatsCalculator::pearson(x, y),
        }
    }
}

/// Split `(x, y)` pairs into contiguous runs of finite values.
pub fn line_segments(points: impl IntoIterator<Item = (f64, Option<f64>)>) -> Vec<Vec<[f64; 2]>> {
    let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();

    for (x, y) in points {
        match y {
            Some(y) if y.is_finite() => current.push([x, y]),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(name: &str, index: usize) -> Color32 {
        match name {
            GOLD_PRICE | GOLD_CHANGE_PCT => GOLD_COLOR,
            SILVER_PRICE | SILVER_CHANGE_PCT => SILVER_COLOR,
            _ => PALETTE[index % PALETTE.len()],
        }
    }

    /// X-axis label for a day number.
    pub fn format_day(value: f64) -> String {
        days_to_date(value.round() as i32)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Calculate beeswarm positions for points with duplicate values.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();
        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        // Spread duplicates symmetrically
        for indices in value_indices.values() {
            if indices.len() > 1 {
                let count = indices.len();
                let step = width / (count - 1) as f64;
                let start = center - width / 2.0;

                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Line chart over time, one colored line per series.
    pub fn draw_time_series(ui: &mut egui::Ui, id: &str, series: &[TimeSeries], y_label: &str) {
        Plot::new(id)
            .height(320.0)
            .legend(Legend::default())
            .x_axis_label("date")
            .y_axis_label(y_label)
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| Self::format_day(mark.value))
            .label_formatter(|name, point| {
                format!("{}\n{}: {:.3}", Self::format_day(point.x), name, point.y)
            })
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(&s.name, i);
                    for segment in &s.segments {
                        plot_ui.line(
                            Line::new(PlotPoints::from(segment.clone()))
                                .color(color)
                                .width(1.5)
                                .name(&s.name),
                        );
                    }
                }
            });
    }

    /// Scatter of paired daily changes.
    pub fn draw_scatter(ui: &mut egui::Ui, id: &str, data: &ScatterData, color: Color32) {
        Plot::new(id)
            .height(300.0)
            .x_axis_label(data.x_label.as_str())
            .y_axis_label(data.y_label.as_str())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(data.points.clone()))
                        .radius(2.0)
                        .color(color.gamma_multiply(0.7))
                        .name(&data.y_label),
                );
            });
    }

    /// Box plot per series with every point overlaid.
    pub fn draw_distribution(ui: &mut egui::Ui, distributions: &[DistributionData]) {
        let x_labels: Vec<String> = distributions.iter().map(|d| d.name.clone()).collect();

        Plot::new("returns_distribution")
            .height(360.0)
            .x_axis_label("metal")
            .y_axis_label("return_%")
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-9 {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, dist) in distributions.iter().enumerate() {
                    let Some(summary) = dist.stats.box_summary else {
                        continue;
                    };
                    let color = Self::series_color(&dist.name, i);

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            summary.lower_whisker,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.upper_whisker,
                        ),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&dist.name));

                    let x_positions = Self::beeswarm_positions(&dist.values, i as f64, 0.35);
                    let points: PlotPoints = x_positions
                        .iter()
                        .zip(dist.values.iter())
                        .map(|(&x, &y)| [x, y])
                        .collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(1.5)
                            .color(color.gamma_multiply(0.5))
                            .name(format!("{} points", dist.name)),
                    );
                }
            });
    }

    /// Draw statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, distributions: &[DistributionData]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("returns_stats_table")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Series", "N", "Mean", "Median", "Std", "P05", "P95"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, dist) in distributions.iter().enumerate() {
                            let s = &dist.stats;
                            ui.label(
                                RichText::new(&dist.name)
                                    .size(11.0)
                                    .color(Self::series_color(&dist.name, i)),
                            );
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            for value in [s.mean, s.median, s.std, s.p05, s.p95] {
                                ui.label(RichText::new(format!("{:.3}", value)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
