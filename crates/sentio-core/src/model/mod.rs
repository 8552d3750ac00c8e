//! Sentiment model contract.
//!
//! The server treats inference as an opaque collaborator behind the
//! [`SentimentModel`] trait; [`load`] resolves a model identifier to a
//! backend. Classification is synchronous and may be compute-heavy, so
//! async callers are expected to run it on a blocking thread.

pub mod lexicon;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, SentioError};

/// Closed label set. Keeping this an enum bounds metric cardinality: there
/// is exactly one way to spell each label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Canonical string used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

/// Top-ranked classification result for one input.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: Sentiment,
    /// Confidence in [0, 1].
    pub score: f64,
}

/// A loaded sentiment classifier.
pub trait SentimentModel: Send + Sync {
    /// Identifier the model was loaded under.
    fn id(&self) -> &str;

    /// Classify `text`, returning the top-ranked label and its confidence.
    fn classify(&self, text: &str) -> Result<Prediction>;
}

/// Resolve a model identifier to a backend.
pub fn load(model_id: &str) -> Result<Arc<dyn SentimentModel>> {
    match model_id {
        lexicon::MODEL_ID => Ok(Arc::new(lexicon::LexiconModel::bundled())),
        other => Err(SentioError::ModelLoad(format!("unknown model id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_resolves_bundled_model() {
        let model = load(lexicon::MODEL_ID).unwrap();
        assert_eq!(model.id(), lexicon::MODEL_ID);
    }

    #[test]
    fn load_rejects_unknown_id() {
        let err = load("distilbert-base-uncased").err().expect("must fail");
        assert_eq!(err.client_code().as_str(), "MODEL_LOAD_FAILED");
    }

    #[test]
    fn sentiment_serializes_uppercase() {
        assert_eq!(Sentiment::Positive.as_str(), "POSITIVE");
        assert_eq!(Sentiment::Negative.as_str(), "NEGATIVE");
    }
}
