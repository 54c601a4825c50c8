#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context as _;
use desktop_clock::{app, AssetDir, ClockApp, Config};
use eframe::egui;

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Overrides may live in a `.env` next to the working directory.
    dotenvy::dotenv().ok();
    env_logger::init();

    let assets = AssetDir::locate()?;
    let config = Config::from_env(&assets)?;
    // The close control cannot render without its icon, so fail before any
    // window is shown. A missing font merely falls back later.
    let icon = assets
        .load_icon("exit.png", 24)
        .context("the close-button icon is a required asset")?;

    let viewport = egui::ViewportBuilder::default()
        .with_decorations(false)
        .with_always_on_top()
        .with_transparent(true)
        .with_resizable(false)
        .with_taskbar(false)
        .with_inner_size(app::initial_window_size(&config));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "desktop clock",
        native_options,
        Box::new(move |cc| Box::new(ClockApp::new(cc, config, icon))),
    )
    .map_err(|err| anyhow::anyhow!("event loop error: {err}"))
}
