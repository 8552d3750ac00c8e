//! Model readiness.
//!
//! The classifier loads after the listener is already accepting traffic, so
//! readiness is an explicit state machine rather than a nullable handle:
//! `Loading -> Ready | Failed`, with `Failed` terminal. Handlers only ever
//! take short read locks on the slot.

use std::sync::{Arc, RwLock};

use sentio_core::error::{Result, SentioError};
use sentio_core::model::{self, SentimentModel};

use crate::app_state::AppState;

enum ModelStatus {
    Loading,
    Ready(Arc<dyn SentimentModel>),
    Failed(String),
}

pub struct ModelSlot {
    status: RwLock<ModelStatus>,
}

impl Default for ModelSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSlot {
    pub fn new() -> Self {
        Self {
            status: RwLock::new(ModelStatus::Loading),
        }
    }

    /// The loaded model, or `Unavailable` while loading / after a failed
    /// load. Callers surface this as a 503 with retry guidance.
    pub fn get(&self) -> Result<Arc<dyn SentimentModel>> {
        let status = self
            .status
            .read()
            .map_err(|_| SentioError::Internal("model slot lock poisoned".into()))?;
        match &*status {
            ModelStatus::Ready(model) => Ok(Arc::clone(model)),
            ModelStatus::Loading => Err(SentioError::Unavailable(
                "model is still loading, retry later".into(),
            )),
            ModelStatus::Failed(reason) => Err(SentioError::Unavailable(format!(
                "model failed to load: {reason}"
            ))),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(
            self.status.read().as_deref(),
            Ok(ModelStatus::Ready(_))
        )
    }

    pub fn set_ready(&self, model: Arc<dyn SentimentModel>) {
        if let Ok(mut status) = self.status.write() {
            *status = ModelStatus::Ready(model);
        }
    }

    pub fn set_failed(&self, reason: String) {
        if let Ok(mut status) = self.status.write() {
            *status = ModelStatus::Failed(reason);
        }
    }
}

/// Load the configured model off the runtime and publish the outcome into
/// the slot. Requests keep getting 503 until this resolves; a load failure
/// parks the slot in `Failed` and the process keeps serving health checks.
pub async fn load_in_background(state: AppState) {
    let model_id = state.cfg().model.id.clone();
    tracing::info!(%model_id, "loading model");

    let loaded = tokio::task::spawn_blocking(move || model::load(&model_id)).await;

    match loaded {
        Ok(Ok(model)) => {
            tracing::info!(model_id = %model.id(), "model loaded");
            state.model().set_ready(model);
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "model load failed, predictions stay unavailable");
            state.model().set_failed(e.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "model load task panicked");
            state.model().set_failed(format!("load task panicked: {e}"));
        }
    }
}
