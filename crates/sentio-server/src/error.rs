//! HTTP mapping for the shared error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sentio_core::error::{ClientCode, SentioError};

/// Wrapper giving `SentioError` an HTTP shape: status from the stable
/// client code, JSON body `{"error", "detail"}`.
#[derive(Debug)]
pub struct HttpError(pub SentioError);

impl From<SentioError> for HttpError {
    fn from(e: SentioError) -> Self {
        Self(e)
    }
}

fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::Unavailable | ClientCode::ModelLoad => StatusCode::SERVICE_UNAVAILABLE,
        ClientCode::Inference | ClientCode::Config | ClientCode::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = Json(json!({
            "error": code.as_str(),
            "detail": self.0.to_string(),
        }));
        (status_for(code), body).into_response()
    }
}
