mod app;
mod chart;
mod color;
mod config;
mod controller;
mod data;
mod error;
mod selection;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::LaunchDashboardApp;
use config::Args;
use state::AppState;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    let dataset = data::loader::load_file(&args.dataset)
        .inspect_err(|e| log::error!("Failed to load {}: {e}", args.dataset.display()))
        .with_context(|| format!("loading launch records from {}", args.dataset.display()))?;

    let state = AppState::with_selection(Arc::new(dataset), &args.site, args.payload_range)
        .context("applying initial selection")?;

    if args.print_charts {
        let charts = serde_json::json!({
            "site": state.site(),
            "payload_range": state.payload_range(),
            "outcome_chart": state.outcome_chart().published(),
            "correlation_chart": state.correlation_chart().published(),
        });
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
