//! Gold & Silver vs Geopolitical Risk - interactive EDA dashboard.

use anyhow::Context;
use eframe::egui;
use gold_risk_eda::gui::DashboardApp;
use gold_risk_eda::settings::Settings;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load dashboard settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(data_path = %settings.data_path.display(), "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Gold & Silver vs Geopolitical Risk"),
        ..Default::default()
    };

    eframe::run_native(
        "Gold & Silver vs Geopolitical Risk",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with an error: {e}"))
}
