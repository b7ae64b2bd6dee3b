mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::SesmtDashboardApp;
use color::Theme;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = config::load_config().unwrap_or_else(|e| {
        log::error!("Invalid dashboard config, using defaults: {e:#}");
        DashboardConfig::default()
    });
    let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
        log::error!("Invalid theme, using defaults: {e:#}");
        Theme::default()
    });

    // Optional spreadsheet to open on start.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let mut app = SesmtDashboardApp::new(cc, config, theme);
            if let Some(path) = initial_file {
                app.state.load_path(&path);
            }
            Ok(Box::new(app))
        }),
    )
}
