#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::{egui::ViewportBuilder, NativeOptions};

mod config;
mod gui;
mod load;
mod pool;
mod rotation;
mod search;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::GalleryConfig::default();

    let mut opts = NativeOptions::default();
    opts.viewport = ViewportBuilder::default().with_inner_size([560.0, 600.0]);

    eframe::run_native(
        "TuneWall",
        opts,
        Box::new(move |cc| {
            let mut app = gui::GalleryApp::new(cc.egui_ctx.clone(), config);
            // Fill the grid from the default query right away.
            app.start_load();
            Box::new(app)
        }),
    )
}
