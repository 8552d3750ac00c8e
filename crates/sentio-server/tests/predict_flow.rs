//! End-to-end tests driving the real router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use tower::ServiceExt;

use sentio_core::model::{self, lexicon};
use sentio_server::app_state::AppState;
use sentio_server::{api, config, router};

fn test_state(ready: bool) -> AppState {
    let state = AppState::new(config::ServerConfig::default()).expect("state init");
    if ready {
        state
            .model()
            .set_ready(model::load(lexicon::MODEL_ID).expect("bundled model"));
    }
    state
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_green_before_model_is_ready() {
    let app = router::build_router(test_state(false));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn predict_returns_503_while_loading() {
    let app = router::build_router(test_state(false));

    let response = app
        .oneshot(predict_request(r#"{"text": "I love this!"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
    assert!(body["detail"].as_str().unwrap().contains("loading"));
}

#[tokio::test]
async fn predict_returns_503_after_failed_load() {
    let state = test_state(false);
    state.model().set_failed("unknown model id: nope".into());
    let app = router::build_router(state);

    let response = app
        .oneshot(predict_request(r#"{"text": "I love this!"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn predict_classifies_once_ready() {
    let app = router::build_router(test_state(true));

    let response = app
        .oneshot(predict_request(r#"{"text": "I love this!"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["text"], "I love this!");
    let sentiment = body["sentiment"].as_str().unwrap();
    assert!(sentiment == "POSITIVE" || sentiment == "NEGATIVE");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn predict_accepts_empty_text() {
    let app = router::build_router(test_state(true));

    let response = app.oneshot(predict_request(r#"{"text": ""}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["confidence"], 0.5);
}

#[tokio::test]
async fn prediction_outcome_shows_up_in_metrics() {
    let state = test_state(true);
    let app = router::build_router(state);

    let response = app
        .clone()
        .oneshot(predict_request(r#"{"text": "terrible, awful, worst ever"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sentiment"], "NEGATIVE");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("sentio_predictions_total{sentiment=\"NEGATIVE\"} 1"));
    assert!(text.contains("sentio_requests_total{endpoint=\"/predict\",method=\"POST\"} 1"));
    assert!(text.contains("sentio_request_latency_seconds_count{endpoint=\"/predict\"} 1"));
}

#[tokio::test]
async fn timing_layer_is_transparent_to_the_response() {
    let instrumented = router::build_router(test_state(true));
    let bare = Router::new()
        .route("/predict", post(api::predict::predict))
        .with_state(test_state(true));

    let req = r#"{"text": "a good movie with a bad ending"}"#;
    let wrapped = instrumented.oneshot(predict_request(req)).await.unwrap();
    let plain = bare.oneshot(predict_request(req)).await.unwrap();

    assert_eq!(wrapped.status(), plain.status());
    assert_eq!(wrapped.headers(), plain.headers());

    let wrapped_body = axum::body::to_bytes(wrapped.into_body(), usize::MAX)
        .await
        .unwrap();
    let plain_body = axum::body::to_bytes(plain.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(wrapped_body, plain_body);
}

#[tokio::test]
async fn malformed_bodies_are_client_errors() {
    let app = router::build_router(test_state(true));

    // Invalid JSON.
    let response = app
        .clone()
        .oneshot(predict_request("{not json"))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    // Unknown extra field is rejected by the strict request schema.
    let response = app
        .clone()
        .oneshot(predict_request(r#"{"text": "ok", "mode": "fast"}"#))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    // Missing content type.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::from(r#"{"text": "ok"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn oversized_text_is_rejected_before_inference() {
    let mut cfg = config::ServerConfig::default();
    cfg.model.max_text_bytes = 16;
    let state = AppState::new(cfg).expect("state init");
    state
        .model()
        .set_ready(model::load(lexicon::MODEL_ID).expect("bundled model"));
    let app = router::build_router(state);

    let long = "x".repeat(64);
    let response = app
        .oneshot(predict_request(&format!(r#"{{"text": "{long}"}}"#)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn every_endpoint_is_counted_by_the_pipeline() {
    let state = test_state(true);
    let app = router::build_router(state.clone());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(state.metrics().requests_total.value(&["/", "GET"]), 3);
}
