use http::StatusCode;
use thiserror::Error;

/// Coarse classification of a failure, used for diagnostics.
///
/// Callers of the data accessors never see this; they only receive an
/// [`crate::error_handler::ErrorEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport-level failure (connect, timeout, request error). Retried.
    Network,
    /// The request completed with a non-2xx status.
    HttpStatus,
    /// The body could not be read or decoded as JSON.
    Parse,
    /// The body decoded but does not describe valid domain data.
    Validation,
    /// Local failures: configuration, I/O, logging setup.
    Other,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Fetch failed for {url} after {retries} retries")]
    RetriesExhausted { url: String, retries: u32 },

    // Data parsing and validation errors
    #[error("API returned malformed JSON: {message} (context: {context})")]
    ApiMalformedJson { message: String, context: String },

    #[error("Failed to read response body: {message} (context: {context})")]
    BodyRead { message: String, context: String },

    #[error("API returned unexpected data structure: {message} (context: {context})")]
    ApiUnexpectedStructure { message: String, context: String },

    #[error("API response signalled an error: {context}")]
    ApiErrorPayload { context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    VersionParse(#[from] semver::Error),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create the error used when every retry of a transport failure failed too
    pub fn retries_exhausted(url: impl Into<String>, retries: u32) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            retries,
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a body read error
    pub fn body_read(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::BodyRead {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create the error for a decoded body that carries `"error": true`
    pub fn api_error_payload(context: impl Into<String>) -> Self {
        Self::ApiErrorPayload {
            context: context.into(),
        }
    }

    /// Maps a completed non-success response to the matching error variant.
    pub fn from_status(status: StatusCode, url: impl Into<String>) -> Self {
        let url = url.into();
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        match status_code {
            404 => Self::api_not_found(url),
            429 => Self::api_rate_limit(reason, url),
            400..=499 => Self::api_client_error(status_code, reason, url),
            502 | 503 => Self::api_service_unavailable(status_code, reason, url),
            _ => Self::api_server_error(status_code, reason, url),
        }
    }

    /// Transport failures are the only retryable errors. A completed response,
    /// whatever its status, is never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ApiFetch(_)
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
        )
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::ApiFetch(_)
            | AppError::NetworkTimeout { .. }
            | AppError::NetworkConnection { .. }
            | AppError::RetriesExhausted { .. } => FailureKind::Network,
            AppError::ApiNotFound { .. }
            | AppError::ApiServerError { .. }
            | AppError::ApiClientError { .. }
            | AppError::ApiRateLimit { .. }
            | AppError::ApiServiceUnavailable { .. } => FailureKind::HttpStatus,
            AppError::ApiParse(_)
            | AppError::ApiMalformedJson { .. }
            | AppError::BodyRead { .. } => FailureKind::Parse,
            AppError::ApiUnexpectedStructure { .. }
            | AppError::ApiErrorPayload { .. } => FailureKind::Validation,
            AppError::Io(_)
            | AppError::TomlSerialize(_)
            | AppError::TomlDeserialize(_)
            | AppError::Config(_)
            | AppError::VersionParse(_)
            | AppError::LogSetup(_) => FailureKind::Other,
        }
    }
}
