mod bridge;
mod engine;
mod renderer;
mod types;
mod ui;

use crate::types::config::AppConfig;
use crate::ui::app::MovieStreamApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let (config, config_problem) = AppConfig::discover();
    init_tracing(&config.log_filter);
    if let Some(e) = config_problem {
        tracing::warn!("{e}; using defaults");
    }
    tracing::info!(
        layout = ?config.layout,
        tick_ms = config.tick_interval().as_millis() as u64,
        "starting MovieStream"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([config.width, config.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    let title = config.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            let app = MovieStreamApp::new(cc, &config)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))?;
    Ok(())
}
