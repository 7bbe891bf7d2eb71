// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script Recorder
//!
//! A desktop devtool for annotating live device screenshots and generating
//! automation script snippets from the annotations.

mod app;
mod config;
mod device;
mod io;
mod models;
mod recorder;
mod script;
mod ui;
mod util;

use anyhow::Result;
use app::RecorderApp;
use clap::Parser;
use device::http::HttpDeviceClient;
use io::storage::SessionStorage;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "script-recorder", version, about)]
struct Args {
    /// Config file (defaults to config.yaml in the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug server address, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Start with automatic screenshots switched off
    #[arg(long)]
    no_auto_capture: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(config::config_path);
    let mut config = config::load_config(&config_path);
    if let Some(host) = args.host {
        config.device_host = host;
    }
    if args.no_auto_capture {
        config.auto_capture_on_start = false;
    }

    let client = Arc::new(HttpDeviceClient::new(
        config.device_host.clone(),
        config.request_timeout(),
    ));
    let storage = SessionStorage::open(SessionStorage::default_path());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("Script Recorder"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Script Recorder",
        options,
        Box::new(move |_cc| Ok(Box::new(RecorderApp::new(&config, client, storage)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
