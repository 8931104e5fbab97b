//! Narrative readings from a remote language model.
//!
//! The engine never calls out on its own: callers build a [`NarrativeClient`]
//! once at startup (from `[narrative]` config) and pass it to
//! [`generate_reading`]. A failed call leaves the computed chart untouched, so
//! callers can still show it.

use crate::chart::NumerologyChart;
use crate::config::NarrativeConfig;
use crate::report::{build_reading_prompt, READING_SYSTEM_PROMPT};
use std::sync::Mutex;
use std::time::Duration;

/// Narrative backend errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative readings are disabled in configuration")]
    Disabled,

    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("model returned an empty reading")]
    EmptyResponse,
}

/// Anything that can turn a prompt into free-form text
pub trait NarrativeClient: Send + Sync {
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, NarrativeError>;
}

// ============================================================================
// HTTP CLIENT (OpenAI-compatible chat completions)
// ============================================================================

pub struct HttpNarrativeClient {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl HttpNarrativeClient {
    /// Build from config, reading the API key from the configured env var
    pub fn from_config(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        if !config.enabled {
            return Err(NarrativeError::Disabled);
        }

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| NarrativeError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(config, api_key)
    }

    pub fn new(config: &NarrativeConfig, api_key: String) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NarrativeError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

impl NarrativeClient for HttpNarrativeClient {
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, NarrativeError> {
        let request_body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
        });

        tracing::info!(model = %self.model, url = %self.completions_url(), "requesting narrative reading");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    NarrativeError::Timeout(self.timeout_secs)
                } else {
                    NarrativeError::Http(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NarrativeError::Http(format!(
                "HTTP {} from narrative backend: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| NarrativeError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_message_content(&response_json)
    }
}

/// Pull `choices[0].message.content` out of a chat completion
pub fn extract_message_content(response: &serde_json::Value) -> Result<String, NarrativeError> {
    let content = response
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            NarrativeError::InvalidResponse("missing choices[0].message.content".to_string())
        })?;

    let content = content.trim();
    if content.is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(content.to_string())
}

// ============================================================================
// FAKE CLIENT (tests, offline runs)
// ============================================================================

/// Replays canned responses; the last one repeats
pub struct FakeNarrativeClient {
    responses: Mutex<Vec<Result<String, NarrativeError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeNarrativeClient {
    pub fn new(responses: Vec<Result<String, NarrativeError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn always_error(error: NarrativeError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// User prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl NarrativeClient for FakeNarrativeClient {
    fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, NarrativeError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(user_prompt.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| NarrativeError::Http("fake client poisoned".to_string()))?;

        match responses.len() {
            0 => Err(NarrativeError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

// ============================================================================
// READING
// ============================================================================

/// Ask the client for a reading of `chart`
pub fn generate_reading(
    client: &dyn NarrativeClient,
    chart: &NumerologyChart,
) -> Result<String, NarrativeError> {
    let prompt = build_reading_prompt(chart);

    match client.generate(READING_SYSTEM_PROMPT, &prompt) {
        Ok(reading) => {
            tracing::info!(name = chart.record.name(), chars = reading.len(), "reading generated");
            Ok(reading)
        }
        Err(e) => {
            tracing::warn!(name = chart.record.name(), error = %e, "reading failed");
            Err(e)
        }
    }
}
