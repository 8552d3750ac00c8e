use serde::Deserialize;
use sentio_core::error::{Result, SentioError};
use sentio_core::model::lexicon;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub http: HttpSection,

    #[serde(default)]
    pub model: ModelSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            http: HttpSection::default(),
            model: ModelSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SentioError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.http.validate()?;
        self.model.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl HttpSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(SentioError::Config(
                "http.listen must be a valid socket address".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    /// Identifier of the classifier to load at startup.
    #[serde(default = "default_model_id")]
    pub id: String,

    /// Upper bound on accepted input size; larger texts are rejected before
    /// they reach the model.
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            id: default_model_id(),
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

impl ModelSection {
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(SentioError::Config("model.id must not be empty".into()));
        }
        if !(1..=1_048_576).contains(&self.max_text_bytes) {
            return Err(SentioError::Config(
                "model.max_text_bytes must be between 1 and 1048576".into(),
            ));
        }
        Ok(())
    }
}

fn default_model_id() -> String {
    lexicon::MODEL_ID.into()
}

fn default_max_text_bytes() -> usize {
    16_384
}
