//! sentio server binary.
//!
//! Startup order matters: the listener binds and serves immediately while
//! the model loads in the background, so early predictions answer 503
//! instead of blocking.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use sentio_server::{app_state, config, inference, router};

const CONFIG_PATH: &str = "sentio.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_or_default(CONFIG_PATH).expect("config load failed");
    let listen: SocketAddr = cfg
        .http
        .listen
        .parse()
        .expect("http.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("state init failed");
    tokio::spawn(inference::load_in_background(state.clone()));

    let app = router::build_router(state);

    tracing::info!(%listen, "sentio-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
