//! Dashboard Main Application
//! Main window with control panel and tabbed chart viewer.

use crate::charts::ChartData;
use crate::data::{filter_up_to_year, load_cached, year_bounds, LoadedTable, TableCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::settings::Settings;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

/// CSV loading result from background thread
enum LoadResult {
    Complete(Arc<LoadedTable>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    settings: Settings,
    cache: Arc<TableCache>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    dataset: Option<Arc<LoadedTable>>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut app = Self {
            cache: Arc::new(TableCache::new()),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            dataset: None,
            load_rx: None,
            settings,
        };
        let path = app.settings.data_path.clone();
        app.start_load(path);
        app
    }

    /// Load a dataset through the shared cache on a background thread.
    fn start_load(&mut self, path: PathBuf) {
        if self.control_panel.is_loading {
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.is_loading = true;
        self.control_panel
            .set_status(&format!("Loading {}...", path.display()));

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let cache = Arc::clone(&self.cache);

        thread::spawn(move || {
            let result = match load_cached(&cache, &path) {
                Ok(loaded) => LoadResult::Complete(loaded),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "dataset load failed");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.control_panel.is_loading {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.set_bounds(None);
            self.start_load(path);
        }
    }

    /// Forget the cached table for the current file and read it again.
    fn handle_reload(&mut self) {
        if let Some(path) = self.control_panel.csv_path.clone() {
            self.cache.invalidate(&path);
            self.start_load(path);
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(loaded)) => {
                self.control_panel.is_loading = false;
                self.on_loaded(loaded);
            }
            Ok(LoadResult::Error(message)) => {
                self.control_panel.is_loading = false;
                self.dataset = None;
                self.control_panel.set_bounds(None);
                self.control_panel.set_status(&format!("Error: {}", message));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.is_loading = false;
                self.control_panel
                    .set_status("Error: loader thread exited unexpectedly");
            }
        }
    }

    fn on_loaded(&mut self, loaded: Arc<LoadedTable>) {
        match year_bounds(&loaded.table) {
            Ok(bounds) => {
                self.control_panel.set_bounds(bounds);
                self.control_panel.report = loaded.report.clone();
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    loaded.table.height(),
                    loaded.table.column_names().len()
                ));
                self.dataset = Some(loaded);
                self.refresh_view();
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Recompute the filtered view for the selected end year.
    fn refresh_view(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let end_year = self.control_panel.end_year;

        let view = filter_up_to_year(&dataset.table, end_year).and_then(|filtered| {
            let chart_data = ChartData::from_table(&filtered)?;
            Ok((filtered, chart_data))
        });

        match view {
            Ok((filtered, chart_data)) => {
                debug!(end_year, rows = filtered.height(), "view refreshed");
                self.control_panel.filtered_rows = filtered.height();
                let preview = filtered.head(self.settings.preview_rows);
                self.chart_viewer.set_view(chart_data, preview);
            }
            Err(e) => {
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.control_panel.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::YearChanged => self.refresh_view(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
