//! esb-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, connects the
//! database, spawns the background feeders, and starts the admin HTTP
//! server.  All route handlers live in `routes.rs`; all shared state types
//! live in `state.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use esb_daemon::{routes, state};
use esb_feed::{spawn_feeders, ExchangeFeeder, Feeder, PoolGenerationFeeder};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    setup_tracing();

    let cfg = esb_config::Config::from_env()?;

    let pool = esb_db::connect(&cfg.database_url).await?;
    esb_db::migrate(&pool).await?;
    let store = esb_db::PgStore::new(pool);

    let exchange = cfg.exchange.clone();
    let client = esb_exchange::Client::new(exchange.api_key, exchange.api_secret, exchange.base_url);

    // Additional feed sources (e.g. an external odds provider) register
    // here; each entry becomes one independent loop.
    let feeders: Vec<Arc<dyn Feeder>> = vec![
        Arc::new(ExchangeFeeder::new(
            store.clone(),
            client,
            cfg.exchange_feed_interval,
        )),
        Arc::new(PoolGenerationFeeder::new(store.clone(), cfg.pool_gen_interval)),
    ];
    let _feed_tasks = spawn_feeders(feeders);

    let shared = Arc::new(state::AppState::new(store));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(admin_cors());

    let addr = admin_addr().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8899)));
    info!("esb-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Admin bind address, ESB_DAEMON_ADDR when set.
fn admin_addr() -> Option<SocketAddr> {
    std::env::var("ESB_DAEMON_ADDR").ok()?.parse().ok()
}

/// The admin surface only serves local tooling.
fn admin_cors() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
