//! begone operator runtime.
//!
//! - Loads `begone.yaml` (or `$BEGONE_CONFIG`)
//! - Loads the rules document, creating the default one when absent
//! - Refuses to start when the rules document is corrupt
//! - Serves the operator command surface over HTTP

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use begone_runtime::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("BEGONE_CONFIG").unwrap_or_else(|_| "begone.yaml".to_string());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => fatal("config load failed", &e),
    };
    let state = match app_state::AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => fatal("failed to load rules; refusing to start", &e),
    };
    let listen: SocketAddr = match state.cfg().server.listen.parse() {
        Ok(addr) => addr,
        Err(e) => fatal("server.listen must be a valid SocketAddr", &e),
    };
    let app = router::build_router(state);

    tracing::info!(%listen, "begone runtime starting");
    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => fatal("failed to bind", &e),
    };

    if let Err(e) = axum::serve(listener, app).await {
        fatal("server failed", &e);
    }
}

fn fatal(msg: &str, err: &dyn std::fmt::Display) -> ! {
    tracing::error!(error = %err, "{msg}");
    std::process::exit(1);
}
