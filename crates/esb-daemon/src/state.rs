//! Shared runtime state for esb-daemon.
//!
//! Handlers receive `State<Arc<AppState<S>>>` from Axum. The state is
//! generic over the store so scenario tests can run the router against the
//! in-memory store without a database.

use serde::Serialize;

/// Static build metadata included in the health response.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Shared across all Axum handlers behind an `Arc`.
pub struct AppState<S> {
    pub build: BuildInfo,
    pub store: S,
}

impl<S> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            build: BuildInfo {
                service: "esb-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            store,
        }
    }
}
