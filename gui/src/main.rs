// GUI main entry point using Dioxus
#![allow(non_snake_case)] // Common for Dioxus components

use dioxus::prelude::*;
// Desktop specific imports for Dioxus
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};

mod app;
mod components;
mod config;
mod state; // Application state module

use app::App;
use config::AppConfig;
use state::app_state::AppState;

fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting value edit GUI (Dioxus Desktop)...");

    let app_config = match AppConfig::load_default() {
        Ok(cfg) => {
            tracing::info!("Successfully loaded default configuration version {}.", cfg.version);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load default configuration: {}. Exiting.", e);
            panic!("Failed to load critical default configuration: {}", e);
        }
    };

    let app_state = match AppState::load() {
        Ok(state) => {
            tracing::info!(
                currencies = state.currencies.currencies().len(),
                default_currency = %state.settings.default_currency,
                "Loaded edit settings and currency table"
            );
            state
        }
        Err(e) => {
            tracing::error!("Failed to load edit settings or currencies: {}. Exiting.", e);
            panic!("Failed to load edit settings or currencies: {}", e);
        }
    };

    let desktop_config = DesktopConfig::default().with_window(
        WindowBuilder::new()
            .with_title(app_config.window_title.clone())
            .with_inner_size(LogicalSize::new(480.0, 360.0)),
    );

    // App components read both through the context.
    LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .with_context(app_config)
        .with_context(app_state)
        .launch(App);

    tracing::info!("Value edit GUI finished.");
}
