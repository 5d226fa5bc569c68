use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::drawer::Drawer;
use crate::format;
use crate::panels::PanelHub;
use crate::presenter::ErrorPresenter;
use crate::slideshow::Slideshow;
use crate::ui::{self, DashboardView, FrameView, PanelIntervals};
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub panels: PanelHub,
    pub drawer: Arc<Drawer>,
    pub slideshow: Arc<Slideshow>,
    pub presenter: Arc<ErrorPresenter>,
}

pub async fn serve(state: AppState) -> Result<()> {
    let router = router(state.clone());

    let addr: SocketAddr = state.config.http_bind.parse()?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/show/slides", get(slides))
        .route("/panel/stats", get(stats_fragment))
        .route("/panel/solar", get(solar_fragment))
        .route("/panel/sensor", get(sensor_fragment))
        .route("/panel/network", get(network_fragment))
        .route("/panel/clock", get(clock_fragment))
        .route("/panel/notifications", get(notifications_fragment))
        .route("/panel/alert", get(alert_fragment))
        .route("/panel/frame", get(frame_fragment))
        .route("/api/notifications/drawer", post(toggle_drawer))
        .route("/api/notifications/dismiss", post(dismiss_notification))
        .route(
            "/api/notifications/dismiss_all",
            post(dismiss_all_notifications),
        )
        .route("/api/reboot", post(reboot))
        .route("/api/error/dismiss", post(dismiss_error))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn graceful_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down http server");
}

async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let view = DashboardView {
        stats: state.panels.stats.snapshot().await,
        solar: state.panels.solar.snapshot().await,
        sensor: state.panels.sensor.snapshot().await,
        network: state.panels.network.snapshot().await,
        clock: state.panels.clock.snapshot().await,
        notifications: state.panels.notifications.snapshot().await,
        drawer_open: state.drawer.is_open(),
        modals: state.presenter.view(),
        intervals: PanelIntervals::from_config(&state.config),
    };
    Html(ui::render_dashboard(&view))
}

async fn slides(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    Html(ui::render_frame(&frame_view(&state, &headers)))
}

async fn stats_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_stats(&state.panels.stats.snapshot().await))
}

async fn solar_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_solar(&state.panels.solar.snapshot().await))
}

async fn sensor_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_sensor(&state.panels.sensor.snapshot().await))
}

async fn network_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_network(&state.panels.network.snapshot().await))
}

async fn clock_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_clock(&state.panels.clock.snapshot().await))
}

async fn notifications_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_notifications(
        &state.panels.notifications.snapshot().await,
        state.drawer.is_open(),
    ))
}

async fn alert_fragment(State(state): State<AppState>) -> impl IntoResponse {
    Html(ui::render_alert(&state.presenter.view()))
}

#[derive(Deserialize)]
struct FrameQuery {
    width: Option<u32>,
    height: Option<u32>,
}

async fn frame_fragment(
    State(state): State<AppState>,
    Query(params): Query<FrameQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let (Some(width), Some(height)) = (params.width, params.height) {
        state.slideshow.set_viewport(width, height);
    }
    Html(ui::render_frame_panel(&frame_view(&state, &headers)))
}

#[derive(Serialize)]
struct DrawerResponse {
    open: bool,
}

async fn toggle_drawer(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let open = state.drawer.toggle();
    tracing::info!(
        "Notification drawer {}",
        if open { "opened" } else { "closed" }
    );
    Ok(Json(DrawerResponse { open }))
}

#[derive(Deserialize)]
struct DismissRequest {
    datetime: String,
    node: String,
    app: String,
}

async fn dismiss_notification(
    State(state): State<AppState>,
    Json(body): Json<DismissRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = [
        ("datetime", body.datetime),
        ("node", body.node),
        ("app", body.app),
    ];
    state
        .backend
        .get_ok("/pidata/clear_notification/", &query)
        .await
        .map_err(|err| {
            tracing::warn!("Could not clear notification: {err}");
            (
                StatusCode::BAD_GATEWAY,
                format!("Failed to clear notification: {err}"),
            )
        })?;

    state.panels.notifications.trigger();
    Ok(StatusCode::NO_CONTENT)
}

async fn dismiss_all_notifications(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .backend
        .get_ok("/pidata/clear_all_notifications/", &[])
        .await
        .map_err(|err| {
            tracing::warn!("Could not clear notifications: {err}");
            (
                StatusCode::BAD_GATEWAY,
                format!("Failed to clear notifications: {err}"),
            )
        })?;

    state.drawer.set_open(false);
    state.panels.notifications.trigger();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct RebootRequest {
    confirm: bool,
}

async fn reboot(
    State(state): State<AppState>,
    Json(body): Json<RebootRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !body.confirm {
        return Err((StatusCode::BAD_REQUEST, "Confirmation required".into()));
    }

    state.presenter.begin_reboot();
    if let Err(err) = state.backend.get_ok("/system/reboot", &[]).await {
        tracing::warn!("Reboot request failed: {err}");
        let (code, reason) = err.status_parts();
        state.presenter.present(code, &reason);
        return Ok(StatusCode::ACCEPTED);
    }

    tracing::info!("Reboot requested via dashboard");
    Ok(StatusCode::ACCEPTED)
}

async fn dismiss_error(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.presenter.dismiss_error();
    Ok(StatusCode::NO_CONTENT)
}

fn frame_view(state: &AppState, headers: &HeaderMap) -> FrameView {
    let slide = state.slideshow.view(Instant::now());
    let fit_cover = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| format::read_cookie(cookies, "display_type"))
        .is_some_and(|fit| fit == "cover");
    FrameView::new(slide, fit_cover)
}
