use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;

use crate::dashboard::{Dashboard, PipelineRun};
use crate::html::to_html;

const REFRESH_PATH: &str = "/refresh";

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/projections.json", get(projections))
        .route(REFRESH_PATH, post(refresh))
        .with_state(dashboard)
}

pub async fn serve(dashboard: Arc<Dashboard>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("listener has no local addr")?;
    tracing::info!("dashboard listening on http://{local}");
    axum::serve(listener, router(dashboard))
        .await
        .context("dashboard server exited")
}

async fn page(State(dashboard): State<Arc<Dashboard>>) -> Response {
    match run_blocking(dashboard).await {
        Ok(run) => Html(to_html(&run.display(), Some(REFRESH_PATH))).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn projections(State(dashboard): State<Arc<Dashboard>>) -> Response {
    match run_blocking(dashboard).await {
        Ok(run) if run.error.is_some() => (StatusCode::SERVICE_UNAVAILABLE, Json(run)).into_response(),
        Ok(run) => Json(run).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn refresh(State(dashboard): State<Arc<Dashboard>>) -> Redirect {
    // The cache lock may be held by an in-flight fetch.
    if let Err(err) = tokio::task::spawn_blocking(move || dashboard.refresh()).await {
        tracing::error!("refresh task failed: {err}");
    }
    Redirect::to("/")
}

/// The fetch uses a blocking client, so it must stay off the async workers.
async fn run_blocking(dashboard: Arc<Dashboard>) -> Result<PipelineRun> {
    tokio::task::spawn_blocking(move || dashboard.run())
        .await
        .context("render task failed")
}

fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!("render failed: {err:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}")).into_response()
}
