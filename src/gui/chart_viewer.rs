//! Chart Viewer Widget
//! Central panel: filtered-data preview followed by the three analysis tabs.

use crate::charts::{ChartData, ChartPlotter, GOLD_COLOR, SILVER_COLOR};
use crate::data::PriceTable;
use egui::{RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Prices,
    RiskVsMetals,
    Distribution,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Prices, Tab::RiskVsMetals, Tab::Distribution];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Prices => "Prices",
            Tab::RiskVsMetals => "Risk vs Metals",
            Tab::Distribution => "Returns Distribution",
        }
    }
}

/// Tabbed chart area for the current year cutoff.
#[derive(Default)]
pub struct ChartViewer {
    pub tab: Tab,
    pub chart_data: Option<ChartData>,
    pub preview: Option<PriceTable>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.chart_data = None;
        self.preview = None;
    }

    pub fn set_view(&mut self, chart_data: ChartData, preview: PriceTable) {
        self.chart_data = Some(chart_data);
        self.preview = Some(preview);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(chart_data) = &self.chart_data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Gold, Silver and Geopolitical Risk");
                ui.label(
                    "Interactive EDA of gold/silver prices and the geopolitical risk index \
                     to explore how they relate over time.",
                );
                ui.add_space(CHART_SPACING);

                if let Some(preview) = &self.preview {
                    ui.label(RichText::new("Filtered data preview").size(14.0).strong());
                    Self::draw_preview(ui, preview);
                    ui.add_space(CHART_SPACING);
                }

                ui.horizontal(|ui| {
                    for tab in Tab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.title());
                    }
                });
                ui.separator();

                match self.tab {
                    Tab::Prices => Self::draw_prices(ui, chart_data),
                    Tab::RiskVsMetals => Self::draw_risk(ui, chart_data),
                    Tab::Distribution => Self::draw_distribution(ui, chart_data),
                }
            });
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &PriceTable) {
        let columns = preview.column_names();
        ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("preview_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        for column in &columns {
                            ui.label(RichText::new(column).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in 0..preview.height() {
                            for column in &columns {
                                ui.label(RichText::new(preview.cell_text(row, column)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_prices(ui: &mut egui::Ui, chart_data: &ChartData) {
        ui.label(RichText::new("Gold and silver prices over time").size(16.0).strong());
        ChartPlotter::draw_time_series(ui, "prices", &chart_data.prices, "price");
    }

    fn draw_risk(ui: &mut egui::Ui, chart_data: &ChartData) {
        ui.label(RichText::new("Geopolitical risk indices").size(16.0).strong());
        ChartPlotter::draw_time_series(ui, "risk_indices", &chart_data.risk, "value");

        ui.add_space(CHART_SPACING);
        ui.label(
            RichText::new("Daily % change in risk vs daily % change in metals")
                .size(16.0)
                .strong(),
        );

        ui.columns(2, |columns| {
            for (ui, (data, color, title, id)) in columns.iter_mut().zip([
                (&chart_data.risk_vs_gold, GOLD_COLOR, "GPRD % change vs gold % change", "scatter_gold"),
                (&chart_data.risk_vs_silver, SILVER_COLOR, "GPRD % change vs silver % change", "scatter_silver"),
            ]) {
                ui.label(RichText::new(title).size(13.0).strong());
                let correlation = data
                    .correlation
                    .map(|r| format!("Pearson r = {:.3} ({} points)", r, data.points.len()))
                    .unwrap_or_else(|| format!("Pearson r = n/a ({} points)", data.points.len()));
                ui.label(RichText::new(correlation).size(11.0));
                ChartPlotter::draw_scatter(ui, id, data, color);
            }
        });
    }

    fn draw_distribution(ui: &mut egui::Ui, chart_data: &ChartData) {
        ui.label(
            RichText::new("Distribution of daily percentage changes")
                .size(16.0)
                .strong(),
        );
        ChartPlotter::draw_distribution(ui, &chart_data.distributions);
        ui.add_space(10.0);
        ChartPlotter::draw_stats_table(ui, &chart_data.distributions);
    }
}
