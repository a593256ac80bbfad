//! Operator HTTP endpoints.
//!
//! - `/healthz`         : liveness
//! - `/v1/commands`     : run one command line as the configured operator
//! - `/v1/suggestions`  : completions for a partial command line
//! - `/metrics`         : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::command::{CommandOutcome, FAILURE_MESSAGE};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRequest {
    pub input: String,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn run_command(State(state): State<AppState>, Json(req): Json<CommandRequest>) -> Response {
    // Commands persist synchronously; keep the write off the async workers.
    let outcome = tokio::task::spawn_blocking(move || state.run_command(&req.input))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "command task failed");
            CommandOutcome::Failed(FAILURE_MESSAGE.to_string())
        });

    let status = match outcome {
        CommandOutcome::Success(_) => StatusCode::OK,
        CommandOutcome::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CommandOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = Json(json!({
        "status": outcome.status(),
        "message": outcome.message(),
    }));
    (status, body).into_response()
}

pub async fn suggestions(State(state): State<AppState>, Json(req): Json<CommandRequest>) -> Response {
    // Providers read the rule store, which a running command may hold for writing.
    let suggestions = tokio::task::spawn_blocking(move || state.suggest(&req.input))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "suggestion task failed");
            Vec::new()
        });
    Json(json!({ "suggestions": suggestions })).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
