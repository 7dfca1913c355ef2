//! Control Panel Widget
//! Left side panel with the data source, year selector and status.

use crate::data::{CoercionReport, YearBounds};
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub bounds: Option<YearBounds>,
    pub end_year: i32,
    pub filtered_rows: usize,
    pub report: CoercionReport,
    pub status: String,
    pub is_loading: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            bounds: None,
            end_year: 0,
            filtered_rows: 0,
            report: CoercionReport::default(),
            status: "Ready".to_string(),
            is_loading: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the year selector at a freshly loaded table.
    ///
    /// A narrowed selection survives a reload, clamped to the new range;
    /// otherwise the selector shows everything.
    pub fn set_bounds(&mut self, bounds: Option<YearBounds>) {
        if let Some(next) = bounds {
            self.end_year = match self.bounds {
                Some(previous)
                    if previous.contains(self.end_year) && self.end_year < previous.max_year =>
                {
                    next.clamp(self.end_year)
                }
                _ => next.max_year,
            };
        }
        self.bounds = bounds;
    }

    /// "Showing data from {min} to {end} (rows: N)", once a table is loaded.
    pub fn caption(&self) -> Option<String> {
        self.bounds.map(|b| {
            format!(
                "Showing data from {} to {} (rows: {})",
                b.min_year, self.end_year, self.filtered_rows
            )
        })
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🪙 Gold & Silver vs Geopolitical Risk")
                    .size(18.0)
                    .color(Color32::from_rgb(212, 175, 55)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .csv_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file selected".to_string());
                ui.label(RichText::new(&path_text).size(12.0));

                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.is_loading, |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui
                            .add_enabled(self.csv_path.is_some(), egui::Button::new("⟳ Reload"))
                            .on_hover_text("Drop the cached table and read the file again")
                            .clicked()
                        {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Section =====
        ui.label(RichText::new("📅 Year Range").size(14.0).strong());
        ui.add_space(5.0);

        match self.bounds {
            Some(bounds) => {
                let slider = egui::Slider::new(&mut self.end_year, bounds.min_year..=bounds.max_year)
                    .step_by(1.0)
                    .text("Show data up to");
                if ui.add(slider).changed() {
                    action = ControlPanelAction::YearChanged;
                }
                if let Some(caption) = self.caption() {
                    ui.label(RichText::new(caption).size(11.0));
                }
            }
            None => {
                ui.label(RichText::new("No data loaded").size(11.0).color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Quality Section =====
        ui.label(RichText::new("🔍 Data Quality").size(14.0).strong());
        ui.add_space(5.0);

        if self.report.is_clean() {
            ui.label(RichText::new("All numeric cells parsed").size(11.0).color(Color32::GRAY));
        } else {
            egui::Grid::new("coercion_report")
                .striped(true)
                .spacing([8.0, 2.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Column").strong().size(11.0));
                    ui.label(RichText::new("Missing").strong().size(11.0));
                    ui.label(RichText::new("Coerced").strong().size(11.0));
                    ui.label(RichText::new("Nulls").strong().size(11.0));
                    ui.end_row();
                    for (column, quality) in self.report.iter() {
                        ui.label(RichText::new(column).size(11.0));
                        ui.label(RichText::new(quality.missing.to_string()).size(11.0));
                        let color = if quality.coerced > 0 {
                            Color32::from_rgb(243, 156, 18)
                        } else {
                            ui.visuals().text_color()
                        };
                        ui.label(
                            RichText::new(quality.coerced.to_string())
                                .size(11.0)
                                .color(color),
                        );
                        ui.label(RichText::new(quality.nulls().to_string()).size(11.0));
                        ui.end_row();
                    }
                });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    YearChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_reflects_selected_year() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.caption(), None);

        panel.set_bounds(Some(YearBounds {
            min_year: 1985,
            max_year: 2025,
        }));
        assert_eq!(panel.end_year, 2025);

        panel.end_year = 2000;
        panel.filtered_rows = 4000;
        assert_eq!(
            panel.caption().as_deref(),
            Some("Showing data from 1985 to 2000 (rows: 4000)")
        );
    }

    #[test]
    fn reload_keeps_narrowed_year_within_new_range() {
        let mut panel = ControlPanel::new();
        panel.set_bounds(Some(YearBounds {
            min_year: 1985,
            max_year: 2025,
        }));
        panel.end_year = 2000;

        panel.set_bounds(Some(YearBounds {
            min_year: 1990,
            max_year: 2026,
        }));
        assert_eq!(panel.end_year, 2000);

        panel.set_bounds(Some(YearBounds {
            min_year: 2005,
            max_year: 2026,
        }));
        assert_eq!(panel.end_year, 2005);
    }

    #[test]
    fn full_selection_follows_new_max_year() {
        let mut panel = ControlPanel::new();
        panel.set_bounds(Some(YearBounds {
            min_year: 1985,
            max_year: 2025,
        }));
        panel.set_bounds(Some(YearBounds {
            min_year: 1985,
            max_year: 2026,
        }));
        assert_eq!(panel.end_year, 2026);

        panel.set_bounds(None);
        panel.set_bounds(Some(YearBounds {
            min_year: 1985,
            max_year: 2010,
        }));
        assert_eq!(panel.end_year, 2010);
    }
}
