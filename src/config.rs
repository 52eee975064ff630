use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

/// Default model fallback list, highest priority first. Ordering reflects
/// available quota: the experimental flash model is tried before the lite
/// variants, with the standard flash model as the last resort.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-2.0-flash-exp",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash",
];

const DEFAULT_ARXIV_BASE_URL: &str = "http://export.arxiv.org/api/query";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Immutable service configuration, built once at startup and shared by
/// reference with every component that needs it. Nothing reads the process
/// environment after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for the Gemini provider (`GOOGLE_API_KEY`). Optional at
    /// startup; chat requests fail through the normal fallback path until
    /// one is supplied.
    pub google_api_key: Option<String>,
    /// Optional session secret (`SECRET_KEY`).
    pub secret_key: Option<String>,
    /// Bind address.
    pub host: String,
    /// Listen port (`PORT`, default 8080).
    pub port: u16,
    /// Ordered model identifiers tried first-to-last per chat request.
    pub models: Vec<String>,
    /// Base URL of the arXiv query API.
    pub arxiv_base_url: String,
    /// Base URL of the Gemini generative-language API.
    pub gemini_base_url: String,
    /// Fixed timeout for the arXiv search call, in seconds.
    pub arxiv_timeout_secs: u64,
    /// Sampling temperature passed on every model call.
    pub temperature: f64,
    /// Cloud project/location (`GOOGLE_CLOUD_PROJECT` / `GOOGLE_CLOUD_LOCATION`).
    /// Set by some deployment environments; logged at startup, consumed by
    /// no component here.
    pub cloud_project: Option<String>,
    pub cloud_location: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            secret_key: None,
            host: "0.0.0.0".to_string(),
            port: 8080,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            arxiv_base_url: DEFAULT_ARXIV_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            arxiv_timeout_secs: 10,
            temperature: 0.7,
            cloud_project: None,
            cloud_location: None,
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// A missing API key is a warning, not a failure: the service still
    /// starts and serves search/health, and the first chat request surfaces
    /// the problem through the model-exhausted path.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.google_api_key = non_empty_var("GOOGLE_API_KEY");
        if config.google_api_key.is_none() {
            warn!("GOOGLE_API_KEY not found in environment variables");
        }

        config.secret_key = non_empty_var("SECRET_KEY");

        if let Some(port) = non_empty_var("PORT") {
            config.port = port.parse::<u16>().map_err(|e| {
                Error::Config(format!("Invalid PORT value '{port}': {e}"))
            })?;
        }

        config.cloud_project = non_empty_var("GOOGLE_CLOUD_PROJECT");
        config.cloud_location = non_empty_var("GOOGLE_CLOUD_LOCATION");
        if let Some(project) = &config.cloud_project {
            info!(
                "Cloud environment detected: project={}, location={}",
                project,
                config.cloud_location.as_deref().unwrap_or("us-central1")
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that would otherwise fail much later at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("Port must be between 1 and 65535".to_string()));
        }
        if self.models.is_empty() {
            return Err(Error::Config(
                "Model fallback list must not be empty".to_string(),
            ));
        }
        if self.arxiv_timeout_secs == 0 {
            return Err(Error::Config(
                "arXiv timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
