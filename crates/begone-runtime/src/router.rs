//! Axum router wiring for the operator surface.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/v1/commands", post(ops::run_command))
        .route("/v1/suggestions", post(ops::suggestions))
        .with_state(state)
}
