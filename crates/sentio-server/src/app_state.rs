//! Shared application state for the sentio server.
//!
//! One process-scoped context object passed into every handler: config,
//! the registered metric families, and the model readiness slot. Built once
//! at startup; everything inside is either immutable or guards its own
//! mutation.

use std::sync::Arc;

use sentio_core::error::Result;

use crate::config::ServerConfig;
use crate::inference::ModelSlot;
use crate::obs::ApiMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    metrics: ApiMetrics,
    model: ModelSlot,
}

impl AppState {
    /// Build application state. Metric registration failures surface here so
    /// main can fail loudly instead of serving without observability.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let metrics = ApiMetrics::new()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics,
                model: ModelSlot::new(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ApiMetrics {
        &self.inner.metrics
    }

    pub fn model(&self) -> &ModelSlot {
        &self.inner.model
    }
}
