mod backend_bridge;
mod controller;
mod media;
#[cfg(test)]
mod test_support;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use client_core::{load_settings, AdminApi, HttpAdminApi};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::events::UiEvent,
    media::RodioOutput,
    ui::DashboardApp,
};

const APP_TITLE: &str = "Assistant Admin Dashboard";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings().context("failed to load dashboard settings")?;
    tracing::info!(
        api = %settings.api_base_url,
        preview = %settings.preview_base_url,
        "starting dashboard"
    );
    let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::new(&settings));

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_rx, ui_tx, Arc::clone(&api)).context("failed to spawn backend worker")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DashboardApp::new(
                api,
                settings,
                cmd_tx,
                ui_rx,
                RodioOutput::open_default,
            )))
        }),
    )
    .map_err(|err| anyhow!("dashboard window failed: {err}"))
}
