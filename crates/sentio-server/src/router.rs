//! Axum router wiring.
//!
//! Three routes behind the request-timing layer; the layer wraps the whole
//! router so every endpoint, including `/metrics` itself, is counted.

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::health))
        .route("/predict", post(api::predict::predict))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::middleware::track_requests,
        ))
        .with_state(state)
}
