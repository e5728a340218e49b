//! The AI content endpoint.
//!
//! Accepts `{"prompt": "..."}`, forwards it to the language model and answers
//! `{"generatedText": "..."}`. Every response allows any origin.

use crate::error::{ProxyError, UpstreamError};
use sendoff_core::api::{ErrorBody, GenerateResponse};
use serde_json::Value;

/// Language model backend.
pub trait Upstream {
    /// Send `prompt` and return the raw JSON reply.
    fn generate(&self, api_key: &str, prompt: &str) -> Result<Value, UpstreamError>;
}

/// Response produced by [`handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
}

impl ProxyResponse {
    fn preflight() -> Self {
        Self {
            status: 204,
            headers: cors_headers(),
            body: String::new(),
        }
    }

    fn json(status: u16, body: String, full_cors: bool) -> Self {
        let mut headers = if full_cors {
            cors_headers()
        } else {
            vec![("Access-Control-Allow-Origin", "*")]
        };
        headers.push(("Content-Type", "application/json"));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Value of a header, if set.
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

fn cors_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ]
}

/// Handle one request to the endpoint.
pub fn handle(
    method: &str,
    body: &str,
    api_key: Option<&str>,
    upstream: &dyn Upstream,
) -> ProxyResponse {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return ProxyResponse::preflight();
    }
    let method_allowed = method.eq_ignore_ascii_case("POST");
    match generate(method_allowed, body, api_key, upstream) {
        Ok(text) => {
            let body = serde_json::to_string(&GenerateResponse {
                generated_text: text,
            });
            match body {
                Ok(body) => ProxyResponse::json(200, body, false),
                Err(e) => error_response(&ProxyError::InvalidBody(e.to_string())),
            }
        }
        Err(e) => {
            match &e {
                ProxyError::UnexpectedResponse(result) => {
                    log::error!("proxy: AI response structure unexpected: {result}");
                }
                ProxyError::InvalidBody(_) | ProxyError::Upstream(_) => {
                    log::error!("proxy: {e}: {}", e.details().unwrap_or_default());
                }
                ProxyError::MissingApiKey => log::error!("proxy: {e}"),
                ProxyError::MethodNotAllowed | ProxyError::MissingPrompt => {
                    log::warn!("proxy: {e}");
                }
            }
            error_response(&e)
        }
    }
}

fn generate(
    method_allowed: bool,
    body: &str,
    api_key: Option<&str>,
    upstream: &dyn Upstream,
) -> Result<String, ProxyError> {
    if !method_allowed {
        return Err(ProxyError::MethodNotAllowed);
    }
    let request: Value =
        serde_json::from_str(body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
    let api_key = api_key.ok_or(ProxyError::MissingApiKey)?;
    // Anything but a non-empty string is a client mistake
    let prompt = request
        .get("prompt")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .ok_or(ProxyError::MissingPrompt)?;

    let result = upstream.generate(api_key, prompt)?;
    match extract_text(&result) {
        Some(text) => Ok(text.to_string()),
        None => Err(ProxyError::UnexpectedResponse(result)),
    }
}

/// `candidates[0].content.parts[0].text` of a model reply.
pub fn extract_text(result: &Value) -> Option<&str> {
    result
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

fn error_response(error: &ProxyError) -> ProxyResponse {
    let mut body = ErrorBody::new(error.to_string());
    if let Some(details) = error.details() {
        body = body.with_details(details);
    }
    let full_cors = matches!(error, ProxyError::MethodNotAllowed);
    let text = serde_json::to_string(&body)
        .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error));
    ProxyResponse::json(error.status(), text, full_cors)
}
