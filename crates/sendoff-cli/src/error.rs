//! Error types for the Sendoff CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating `sendoff.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Site directory does not exist.
    #[error("site directory {0} does not exist")]
    MissingSiteDir(PathBuf),

    /// Site directory has no index page.
    #[error("site directory {0} has no index.html")]
    MissingIndex(PathBuf),
}

/// Errors talking to the language model service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Request could not be sent or the reply could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Reply was not JSON.
    #[error("invalid JSON from AI service: {0}")]
    Parse(String),
}

/// Why the AI endpoint rejected or failed a request.
///
/// The `Display` text is the `error` field sent to the browser.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Anything other than POST (or the OPTIONS preflight).
    #[error("Method Not Allowed. Only POST requests are accepted.")]
    MethodNotAllowed,

    /// No API key in the environment.
    #[error("Gemini API key not configured on the server.")]
    MissingApiKey,

    /// Body parsed but carried no prompt.
    #[error("Prompt is required in the request body.")]
    MissingPrompt,

    /// Request body was not valid JSON.
    #[error("Failed to process AI request.")]
    InvalidBody(String),

    /// Upstream call failed.
    #[error("Failed to process AI request.")]
    Upstream(#[from] UpstreamError),

    /// Upstream answered without generated text.
    #[error("Unexpected response from AI service.")]
    UnexpectedResponse(serde_json::Value),
}

impl ProxyError {
    /// HTTP status for this error.
    pub const fn status(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::MissingPrompt => 400,
            Self::MissingApiKey
            | Self::InvalidBody(_)
            | Self::Upstream(_)
            | Self::UnexpectedResponse(_) => 500,
        }
    }

    /// Extra detail sent alongside the message.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InvalidBody(message) => Some(serde_json::Value::String(message.clone())),
            Self::Upstream(e) => Some(serde_json::Value::String(e.to_string())),
            Self::UnexpectedResponse(value) => Some(value.clone()),
            Self::MethodNotAllowed | Self::MissingApiKey | Self::MissingPrompt => None,
        }
    }
}

/// Errors starting the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Could not bind the listening socket.
    #[error("failed to start server on {addr}: {message}")]
    Bind { addr: String, message: String },
}
