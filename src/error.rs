//! Error types for the LiveAgent extractor
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the extractor
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error(
        "Organization was not provided in the correct format. Please, provide only the \
         organization name, without \"ladesk.com\". Given: {organization}."
    )]
    InvalidOrganization { organization: String },

    #[error("Unsupported objects specified: {objects:?}. Must be one of {supported:?}.")]
    UnsupportedObjects {
        objects: Vec<String>,
        supported: Vec<String>,
    },

    #[error("Missing API V1 token for API V1 object '{object}'")]
    MissingV1Token { object: String },

    #[error("Could not parse date '{value}' for '{field}'. Use e.g. \"30 days ago\", \"now\" or \"2024-01-31\".")]
    InvalidDate { field: String, value: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Carries no request URL, since v1 URLs contain the API key
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Could not download paginated data for endpoint {endpoint}. Received: {status} - {body}")]
    Fetch {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Key '{key}' not found in response of endpoint {endpoint}")]
    Schema { endpoint: String, key: String },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a fetch error for an endpoint
    pub fn fetch(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a schema error for a missing envelope key
    pub fn schema(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Schema {
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable at the whole-fetch level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_)
            | Error::Timeout { .. }
            | Error::MaxRetriesExceeded { .. }
            | Error::Fetch { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error was caused by the user's configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::MissingConfigField { .. }
                | Error::InvalidConfigValue { .. }
                | Error::InvalidOrganization { .. }
                | Error::UnsupportedObjects { .. }
                | Error::MissingV1Token { .. }
                | Error::InvalidDate { .. }
                | Error::YamlParse(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
