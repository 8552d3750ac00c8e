//! `POST /predict` handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use sentio_core::error::SentioError;
use sentio_core::model::Sentiment;

use crate::app_state::AppState;
use crate::error::HttpError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
}

pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, HttpError> {
    let max = state.cfg().model.max_text_bytes;
    if req.text.len() > max {
        return Err(SentioError::BadRequest(format!(
            "text exceeds {max} bytes"
        ))
        .into());
    }

    // 503 until the background load resolves.
    let model = state.model().get()?;

    // The collaborator is synchronous and may be compute-heavy; keep it off
    // the async workers so independent requests never queue behind it.
    let text = req.text;
    let prediction = tokio::task::spawn_blocking({
        let text = text.clone();
        move || model.classify(&text)
    })
    .await
    .map_err(|e| SentioError::Internal(format!("inference task failed: {e}")))??;

    state
        .metrics()
        .predictions_total
        .inc(&[prediction.label.as_str()]);

    Ok(Json(PredictResponse {
        text,
        sentiment: prediction.label,
        confidence: prediction.score,
    }))
}
