use crate::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Failures from one generation attempt against one named model. The chat
/// gateway consumes these inside its fallback loop; only the stringified
/// form of the final failure ever reaches a caller.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Network(String),

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("response contained no text candidates")]
    EmptyResponse,
}

/// Seam between the chat gateway and the hosted generative-model provider.
///
/// One call, one model, no retries; trying alternatives is the gateway's
/// job. The contract mirrors the provider API: model identifier, user
/// content, system instruction, with the sampling temperature fixed by the
/// implementation.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        message: &str,
        system_instruction: &str,
    ) -> Result<String, BackendError>;
}

// Wire types for the generateContent call.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the Gemini generateContent API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    temperature: f64,
}

impl GeminiClient {
    /// Build from configuration. A missing API key is tolerated here; each
    /// generation attempt then fails with `MissingApiKey` and surfaces
    /// through the gateway's fallback path.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("research-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::Error::Service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.clone(),
            api_key: config.google_api_key.clone(),
            temperature: config.temperature,
        })
    }

    // The key travels in the x-goog-api-key header, never in the URL, so
    // request logging cannot leak it.
    fn request_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        message: &str,
        system_instruction: &str,
    ) -> Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: message }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.request_url(model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        debug!("Model {} returned {} bytes", model, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_names_model_and_never_the_key() {
        let config = Config {
            google_api_key: Some("test-key".to_string()),
            gemini_base_url: "https://example.test".to_string(),
            ..Config::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let url = client.request_url("gemini-2.0-flash");
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(!url.contains("test-key"));
    }

    #[test]
    fn request_body_serializes_to_provider_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: "be brief" }],
            },
            generation_config: GenerationConfig { temperature: 0.7 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn response_text_extraction_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn missing_api_key_fails_fast() {
        let config = Config::default();
        let client = GeminiClient::new(&config).unwrap();
        let result = client.generate("gemini-2.0-flash", "hi", "sys").await;
        assert!(matches!(result, Err(BackendError::MissingApiKey)));
    }
}
