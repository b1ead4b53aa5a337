#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod io;
mod model;
mod ui;

use std::path::PathBuf;

use clap::Parser;

use crate::config::TimelineOptions;
use crate::model::Dataset;

/// Interactive timeline viewer.
#[derive(Parser, Debug)]
#[command(name = "rust-timeline-app", version, about)]
struct Cli {
    /// Timeline JSON file to open on start. Shows a sample timeline when omitted.
    #[arg(long, value_name = "FILE")]
    items: Option<PathBuf>,

    /// Settings file to use instead of the one in the OS config directory.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings_path = cli.config.unwrap_or_else(TimelineOptions::default_path);
    let options = TimelineOptions::load_or_default(&settings_path);

    let (dataset, load_error) = match cli.items.as_deref() {
        Some(path) => match io::load_dataset(path) {
            Ok(dataset) => (dataset, None),
            Err(e) => {
                log::error!("{}; showing the sample timeline", e);
                (Dataset::sample(), Some(e))
            }
        },
        None => (Dataset::sample(), None),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 320.0])
            .with_title("Rust Timeline App"),
        ..Default::default()
    };

    eframe::run_native(
        "Rust Timeline App",
        native_options,
        Box::new(move |cc| {
            let mut app = app::TimelineApp::new(cc, dataset, options, settings_path);
            if let Some(e) = load_error {
                app.report_error(e);
            }
            Ok(Box::new(app))
        }),
    )
}
