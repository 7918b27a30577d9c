//! Robby PDF Reader
//!
//! Multi-tab PDF reader with session restore.

mod app;
mod shortcuts;
mod textures;

use app::ReaderApp;
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use storage::Storage;

/// Fallback config directory, relative to the working directory.
const LOCAL_CONFIG_DIR: &str = ".robby-reader";

#[derive(Debug, Parser)]
#[command(name = "robby-reader")]
#[command(version, about = "Multi-tab PDF reader")]
struct Args {
    /// PDF to open after the previous session is restored.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let storage = Storage::resolve().unwrap_or_else(|err| {
        log::warn!("{err}; keeping session data in {LOCAL_CONFIG_DIR}");
        Storage::with_root(LOCAL_CONFIG_DIR)
    });
    log::info!("session data in {}", storage.root().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Robby PDF Reader"),
        ..Default::default()
    };

    eframe::run_native(
        "Robby PDF Reader",
        options,
        Box::new(move |cc| Ok(Box::new(ReaderApp::new(cc, storage, args.file)))),
    )
}
