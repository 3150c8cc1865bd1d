use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::constants::retry::DEFAULT_RATE_LIMIT_DELAY_SECONDS;

/// Error kinds surfaced to the caller boundary.
///
/// Every [`AppError`] maps onto exactly one kind; the boundary decides the
/// user-visible status from the kind alone, never from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    NotLocated,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServerError,
    Timeout,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::NotLocated => "not_located",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Validation => "validation",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Upstream status taxonomy
    #[error("API resource not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API rejected the credential (401): {url}")]
    ApiUnauthorized { url: String },

    #[error("API credential lacks access (403): {url}")]
    ApiForbidden { url: String },

    #[error("API rate limit exceeded (429), retry after {retry_after:?} (URL: {url})")]
    ApiRateLimit { retry_after: Duration, url: String },

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

    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    // Scheduler outcome
    #[error("Rate limited by upstream after {attempts} attempts")]
    RetriesExhausted { attempts: u32, retry_after: Duration },

    // Resolver outcome when a caller needs a location and none exists
    #[error("Player {global_id} not located on any probed shard")]
    NotLocated { global_id: String },

    // Caller input
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

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

    /// Create a caller input validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    pub fn api_unauthorized(url: impl Into<String>) -> Self {
        Self::ApiUnauthorized { url: url.into() }
    }

    pub fn api_forbidden(url: impl Into<String>) -> Self {
        Self::ApiForbidden { url: url.into() }
    }

    /// Create a rate limit error. A missing hint falls back to the default delay.
    pub fn api_rate_limit(retry_after: Option<Duration>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            retry_after: retry_after
                .unwrap_or(Duration::from_secs(DEFAULT_RATE_LIMIT_DELAY_SECONDS)),
            url: url.into(),
        }
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

    /// Create an API client error (4xx status codes without a dedicated variant)
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

    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn not_located(global_id: impl Into<String>) -> Self {
        Self::NotLocated {
            global_id: global_id.into(),
        }
    }

    /// Maps the error onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ApiNotFound { .. } => ErrorKind::NotFound,
            AppError::NotLocated { .. } => ErrorKind::NotLocated,
            AppError::ApiUnauthorized { .. } => ErrorKind::Unauthorized,
            AppError::ApiForbidden { .. } => ErrorKind::Forbidden,
            AppError::ApiRateLimit { .. } | AppError::RetriesExhausted { .. } => {
                ErrorKind::RateLimited
            }
            AppError::ApiServerError { .. } | AppError::NetworkConnection { .. } => {
                ErrorKind::ServerError
            }
            AppError::NetworkTimeout { .. } => ErrorKind::Timeout,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::ApiFetch(e) if e.is_timeout() => ErrorKind::Timeout,
            AppError::ApiFetch(_)
            | AppError::ApiParse(_)
            | AppError::ApiClientError { .. }
            | AppError::ApiUnexpectedStructure { .. }
            | AppError::Io(_)
            | AppError::TomlSerialize(_)
            | AppError::TomlDeserialize(_)
            | AppError::Config(_)
            | AppError::LogSetup(_) => ErrorKind::Internal,
        }
    }

    /// Credential problems. These abort any probe or aggregation immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthorized | ErrorKind::Forbidden)
    }

    /// Check if a single attempt may be retried by the scheduler
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ApiRateLimit { .. }
                | AppError::ApiServerError { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
        )
    }

    /// Upstream-provided delay for rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AppError::ApiRateLimit { retry_after, .. }
            | AppError::RetriesExhausted { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Check if error indicates an expected absence rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}
