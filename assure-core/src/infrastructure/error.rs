// assure-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- HTTP ---
    #[error("Network Error: {0}")]
    #[diagnostic(
        code(assure::infra::http),
        help("Check connectivity to the platform API (api.base_url).")
    )]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    #[diagnostic(code(assure::infra::api))]
    Api { status: u16, body: String },

    #[error("Session expired or missing")]
    #[diagnostic(
        code(assure::infra::unauthorized),
        help("Run `assure login --token <TOKEN>` again.")
    )]
    Unauthorized,

    #[error("Unexpected response shape from {endpoint}: {message}")]
    #[diagnostic(code(assure::infra::decode))]
    Decode { endpoint: String, message: String },

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(assure::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(assure::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(assure::infra::config))]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(assure::infra::validation))]
    Validation(#[from] validator::ValidationErrors),
}

impl InfrastructureError {
    /// Worth another attempt on the next tick (network hiccup or server-side 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// The server refused the request itself (401, 404, 4xx other than 429).
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Api { status, .. } => (400..500).contains(status) && *status != 429,
            _ => false,
        }
    }

    pub fn is_shape_error(&self) -> bool {
        match self {
            Self::Decode { .. } => true,
            Self::Http(e) => e.is_decode(),
            _ => false,
        }
    }
}
