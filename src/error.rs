//! Unified error handling for the sitedesk client and CLI
//!
//! Every failure carries a stable [`ErrorCode`] so callers and log readers can
//! tell failure origins apart, while the API layer still presents a single
//! error type: transport, HTTP and decoding failures all display as
//! `API Error: <message>`.

use std::fmt;
use thiserror::Error;

/// Unified Result type for all sitedesk operations
pub type Result<T> = std::result::Result<T, DeskError>;

/// Error codes for sitedesk operations
///
/// Each error has a unique code in the format `DXXX` where:
/// - D1XX: Authentication and session errors
/// - D2XX: Network and API errors
/// - D3XX: Storage errors
/// - D4XX: Configuration errors
/// - D5XX: Validation and input errors
/// - D8XX: UI and interaction errors
/// - D9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (D1XX)
    /// D101: Authentication failed
    AuthenticationFailed,
    /// D102: No token stored for an authenticated call
    MissingToken,

    // Network (D2XX)
    /// D201: HTTP request failed
    HttpError,
    /// D202: Request timed out
    ConnectionTimeout,
    /// D203: Connection refused
    ConnectionRefused,
    /// D204: Server answered with a 4xx status
    ClientStatus,
    /// D205: Server answered with a 5xx status
    ServerStatus,
    /// D206: Envelope reported `success: false`
    ApiFailure,
    /// D207: Response body could not be decoded
    InvalidResponse,
    /// D208: Request could not be built
    InvalidRequest,

    // Storage (D3XX)
    /// D301: Reading persisted state failed
    StorageRead,
    /// D302: Writing persisted state failed
    StorageWrite,
    /// D303: Persisted state is corrupt
    StorageCorrupt,

    // Configuration (D4XX)
    /// D401: Configuration error
    ConfigError,
    /// D402: Invalid base URL
    InvalidEndpoint,

    // Validation (D5XX)
    /// D501: Invalid input
    InvalidInput,
    /// D502: Request body failed validation
    ValidationFailed,

    // UI (D8XX)
    /// D801: Dialog error
    DialogError,

    // Internal (D9XX)
    /// D901: Internal error
    InternalError,
    /// D902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::AuthenticationFailed => 101,
            ErrorCode::MissingToken => 102,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::ClientStatus => 204,
            ErrorCode::ServerStatus => 205,
            ErrorCode::ApiFailure => 206,
            ErrorCode::InvalidResponse => 207,
            ErrorCode::InvalidRequest => 208,

            ErrorCode::StorageRead => 301,
            ErrorCode::StorageWrite => 302,
            ErrorCode::StorageCorrupt => 303,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::DialogError => 801,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "D101")
    pub fn as_str(&self) -> String {
        format!("D{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.code())
    }
}

/// Main error type for all sitedesk operations
#[derive(Error, Debug)]
pub enum DeskError {
    // ==================== Authentication Errors (D1XX) ====================
    /// Authentication failed, or no usable session exists
    #[error("{message}")]
    Authentication { code: ErrorCode, message: String },

    // ==================== Network Errors (D2XX) ====================
    /// Transport failure: DNS, connect, abort, body read
    #[error("API Error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Non-2xx HTTP status
    #[error("API Error: {message}")]
    Http {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Envelope with `success: false`, only produced on explicit conversion
    #[error("API Error: {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Undecodable response body
    #[error("API Error: {message}")]
    InvalidResponse {
        code: ErrorCode,
        status: u16,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Status-level failure reported by the retry helper
    #[error("{message}")]
    Request {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Attempt exceeded its time budget
    #[error("API Error: Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    // ==================== Storage Errors (D3XX) ====================
    #[error("Storage error: {message}")]
    Storage {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ==================== Configuration Errors (D4XX) ====================
    #[error("Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    // ==================== Validation Errors (D5XX) ====================
    #[error("Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    // ==================== UI Errors (D8XX) ====================
    #[error("UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    // ==================== Internal Errors (D9XX) ====================
    #[error("Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    #[error("Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

// ==================== Constructor Methods ====================

impl DeskError {
    // --- Authentication ---

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::AuthenticationFailed,
            message: message.into(),
        }
    }

    /// Raised by authenticated calls before any network traffic
    pub fn missing_token() -> Self {
        Self::Authentication {
            code: ErrorCode::MissingToken,
            message: "No authentication token found".to_string(),
        }
    }

    // --- Network ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else if err.is_builder() {
            ErrorCode::InvalidRequest
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let code = if status >= 500 {
            ErrorCode::ServerStatus
        } else {
            ErrorCode::ClientStatus
        };
        Self::Http {
            code,
            status,
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiFailure,
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(status: u16, err: serde_json::Error) -> Self {
        Self::InvalidResponse {
            code: ErrorCode::InvalidResponse,
            status,
            message: format!("Invalid API response: {}", err),
            source: Some(err),
        }
    }

    pub fn client_status(status: u16, reason: &str) -> Self {
        Self::Request {
            code: ErrorCode::ClientStatus,
            status,
            message: format!("Client error: {} {}", status, reason),
        }
    }

    pub fn server_status(status: u16, reason: &str) -> Self {
        Self::Request {
            code: ErrorCode::ServerStatus,
            status,
            message: format!("Server error: {} {}", status, reason),
        }
    }

    pub fn timeout(after_ms: u64) -> Self {
        Self::Timeout { after_ms }
    }

    // --- Storage ---

    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::Storage {
            code: ErrorCode::StorageRead,
            message: message.into(),
            source: None,
        }
    }

    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::Storage {
            code: ErrorCode::StorageWrite,
            message: message.into(),
            source: None,
        }
    }

    pub fn storage_io(context: &str, err: std::io::Error) -> Self {
        Self::Storage {
            code: ErrorCode::StorageWrite,
            message: format!("{}: {}", context, err),
            source: Some(err),
        }
    }

    pub fn storage_corrupt(message: impl Into<String>) -> Self {
        Self::Storage {
            code: ErrorCode::StorageCorrupt,
            message: message.into(),
            source: None,
        }
    }

    // --- Configuration ---

    pub fn config_from_error(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::InvalidEndpoint,
            message: message.into(),
            source: None,
        }
    }

    // --- Validation ---

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    // --- Internal ---

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Http { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::InvalidResponse { code, .. } => *code,
            Self::Request { code, .. } => *code,
            Self::Timeout { .. } => ErrorCode::ConnectionTimeout,
            Self::Storage { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// HTTP status behind the error, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Api { status, .. } | Self::Request { status, .. } => {
                Some(*status)
            }
            Self::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
            || matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Http { .. }
                | Self::InvalidResponse { .. }
                | Self::Request { .. }
                | Self::Timeout { .. }
        )
    }

    /// Transport failures, timeouts and 5xx statuses are worth another attempt.
    /// A request that could not be built fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { code, .. } => *code != ErrorCode::InvalidRequest,
            Self::Timeout { .. } => true,
            Self::Http { status, .. } | Self::Request { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::InvalidData => {
                ErrorCode::StorageRead
            }
            _ => ErrorCode::StorageWrite,
        };
        Self::Storage {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for DeskError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_from_error(err)
    }
}

impl From<validator::ValidationErrors> for DeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        let field = fields.first().cloned();
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: format!("invalid field(s): {}", fields.join(", ")),
            field,
        }
    }
}

impl From<dialoguer::Error> for DeskError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}
