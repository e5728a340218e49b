//! Gemini `generateContent` client.

use crate::config::AiConfig;
use crate::error::UpstreamError;
use crate::proxy::Upstream;
use serde_json::{json, Value};
use std::time::Duration;

/// Blocking client for one model.
pub struct GeminiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Request URL, without the key.
    pub fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

/// Single-turn request payload.
pub fn payload(prompt: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
    })
}

impl Upstream for GeminiClient {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<Value, UpstreamError> {
        log::debug!("gemini: POST {}", self.url());

        let response = self
            .agent
            .post(&self.url())
            .query("key", api_key)
            .set("Content-Type", "application/json")
            .send_string(&payload(prompt).to_string());

        // Error statuses still carry a JSON body worth passing back as details
        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                log::warn!("gemini: upstream answered {code}");
                response
            }
            Err(ureq::Error::Transport(t)) => return Err(UpstreamError::Network(t.to_string())),
        };

        let text = response
            .into_string()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}
