mod backend;
mod config;
mod drawer;
mod format;
mod panels;
mod payloads;
mod presenter;
mod slideshow;
mod theme;
mod ui;
mod web;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::drawer::Drawer;
use crate::panels::PanelHub;
use crate::presenter::ErrorPresenter;
use crate::slideshow::Slideshow;
use crate::web::AppState;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = Arc::new(AppConfig::from_env());

    tracing::info!(
        "Starting homeboard on {} (backend: {})",
        config.http_bind,
        config.backend_base_url
    );

    let backend = BackendClient::new(
        &config.backend_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let panels = PanelHub::new();
    let drawer = Arc::new(Drawer::new());
    let slideshow = Arc::new(Slideshow::new());
    let presenter = Arc::new(ErrorPresenter::new());

    // Opening the drawer refetches the notification list once, so the rows on
    // screen are current before anyone starts dismissing them.
    let notifications = panels.notifications.clone();
    drawer.on_visibility_change(move |open| {
        if open {
            notifications.trigger();
        }
    });

    panels::spawn_refreshers(&panels, &backend, &config);
    slideshow::spawn_refresher(
        Arc::clone(&slideshow),
        backend.clone(),
        Duration::from_secs(config.slide_interval_secs),
    );

    let state = AppState {
        config: config.clone(),
        backend,
        panels,
        drawer,
        slideshow,
        presenter,
    };

    web::serve(state).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}
