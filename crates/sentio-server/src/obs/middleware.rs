//! Request-timing pipeline.
//!
//! Wraps every request: starts a timer, runs the inner handler, then
//! records the request count and wall-clock latency. The response passes
//! through untouched, and recording cannot fail the request (the registry
//! drops bad samples with a warning instead of erroring).

use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;

pub async fn track_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let endpoint = req.uri().path().to_owned();

    // Elapsed time brackets the inner handler only.
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();

    let metrics = state.metrics();
    metrics.requests_total.inc(&[&endpoint, method.as_str()]);
    metrics.request_latency.observe(&[&endpoint], elapsed);

    response
}
