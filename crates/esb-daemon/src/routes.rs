//! Axum router and all HTTP handlers for esb-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers.  All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use esb_db::FeedStore;
use tracing::info;

use crate::{
    api_types::{ErrorResponse, FeedFlagResponse, HealthResponse, ReadyResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: FeedStore + Send + Sync + 'static,
{
    Router::new()
        .route("/v1/health", get(health::<S>))
        .route("/v1/ready", get(ready::<S>))
        .route("/v1/feed", get(feed_flag::<S>))
        .route("/v1/feed/activate", post(feed_activate::<S>))
        .route("/v1/feed/deactivate", post(feed_deactivate::<S>))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health<S>(State(st): State<Arc<AppState<S>>>) -> impl IntoResponse
where
    S: FeedStore + Send + Sync + 'static,
{
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/ready
// ---------------------------------------------------------------------------

/// Readiness is a store round trip: the feed flag read touches the backing
/// database, so a passing probe means the daemon can actually do work.
pub(crate) async fn ready<S>(State(st): State<Arc<AppState<S>>>) -> Response
where
    S: FeedStore + Send + Sync + 'static,
{
    match st.store.feed_active().await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                error: None,
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                error: Some(format!("{err:#}")),
            }),
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/feed
// ---------------------------------------------------------------------------

pub(crate) async fn feed_flag<S>(State(st): State<Arc<AppState<S>>>) -> Response
where
    S: FeedStore + Send + Sync + 'static,
{
    match st.store.feed_active().await {
        Ok(active) => (StatusCode::OK, Json(FeedFlagResponse { active })).into_response(),
        Err(err) => store_error(err),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/feed/activate, POST /v1/feed/deactivate
// ---------------------------------------------------------------------------

pub(crate) async fn feed_activate<S>(State(st): State<Arc<AppState<S>>>) -> Response
where
    S: FeedStore + Send + Sync + 'static,
{
    set_feed_flag(&st, true).await
}

pub(crate) async fn feed_deactivate<S>(State(st): State<Arc<AppState<S>>>) -> Response
where
    S: FeedStore + Send + Sync + 'static,
{
    set_feed_flag(&st, false).await
}

async fn set_feed_flag<S>(st: &AppState<S>, active: bool) -> Response
where
    S: FeedStore + Send + Sync + 'static,
{
    if let Err(err) = st.store.set_feed_active(active).await {
        return store_error(err);
    }
    info!(active, "feed flag updated");
    (StatusCode::OK, Json(FeedFlagResponse { active })).into_response()
}

fn store_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("{err:#}"),
        }),
    )
        .into_response()
}
