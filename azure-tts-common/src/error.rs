//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the client crates.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration
//! - `AuthError`: Token issuance failures
//! - `Error::UnsupportedVoice`: Locale/gender pair with no known voice (detected before any request)
//! - `Error::Request`: Network or connection failures, with the underlying `reqwest` error
//! - `Error::Api`: Non-success HTTP status from the service (includes endpoint, status and kind)
//! - `Error::Decode`: Malformed response bodies
//! - `Error::Timeout` / `Error::Cancelled`: Aborted synthesis requests

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the client crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authentication errors (token endpoint rejected the key or was unreachable)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No voice is known for the requested locale and gender.
    #[error("Unable to locate a voice for locale={locale}, gender={gender}")]
    UnsupportedVoice {
        /// Locale wire string (e.g. `en-US`)
        locale: String,
        /// Gender wire string (e.g. `Female`)
        gender: String,
    },

    /// Transport failure while talking to an endpoint.
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        /// The endpoint that was called
        endpoint: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// API errors with endpoint and HTTP status context
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Classification of the status code
        kind: ApiErrorKind,
        /// Description of the failure
        message: String,
    },

    /// A response body could not be decoded.
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode {
        /// The endpoint whose response was malformed
        endpoint: String,
        /// Decoder error message
        message: String,
    },

    /// Operation timeout errors, carrying the bound that elapsed
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an API error for a non-success status.
    ///
    /// The kind and message are derived from the status code.
    ///
    /// # Example
    ///
    /// ```
    /// use azure_tts_common::error::{ApiErrorKind, Error};
    ///
    /// let err = Error::api("https://westus.tts.speech.microsoft.com/cognitiveservices/v1", 429);
    /// assert_eq!(err.status_code(), Some(429));
    /// assert!(matches!(err, Error::Api { kind: ApiErrorKind::TooManyRequests, .. }));
    /// assert!(err.to_string().contains("429"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16) -> Self {
        let kind = ApiErrorKind::from_status(status_code);
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            kind,
            message: kind.description().to_string(),
        }
    }

    /// Create a transport error for the given endpoint.
    pub fn request(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Request {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a decode error.
    ///
    /// # Example
    ///
    /// ```
    /// use azure_tts_common::error::Error;
    ///
    /// let err = Error::decode("https://example.com/voices/list", "expected an array");
    /// assert!(err.to_string().contains("expected an array"));
    /// ```
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported voice error.
    pub fn unsupported_voice(locale: impl Into<String>, gender: impl Into<String>) -> Self {
        Error::UnsupportedVoice {
            locale: locale.into(),
            gender: gender.into(),
        }
    }

    /// Create a new timeout error.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use azure_tts_common::error::Error;
    ///
    /// let err = Error::timeout(Duration::from_secs(30));
    /// assert!(err.to_string().contains("30s"));
    ///
    /// let err = Error::timeout(Duration::from_millis(250));
    /// assert!(err.to_string().contains("250ms"));
    /// ```
    pub fn timeout(after: Duration) -> Self {
        Error::Timeout(after)
    }

    /// HTTP status carried by this error, if the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::Auth(AuthError::UnexpectedStatus { status_code, .. }) => Some(*status_code),
            _ => None,
        }
    }
}

/// Classification of non-success status codes returned by the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400: missing, empty or invalid parameter
    BadRequest,
    /// 401: bad or stale credential
    Unauthorized,
    /// 413: SSML payload too large
    PayloadTooLarge,
    /// 415: wrong content type
    UnsupportedMediaType,
    /// 429: quota or rate limit exceeded
    TooManyRequests,
    /// 502: network or server-side failure
    BadGateway,
    /// Any other status
    Unexpected,
}

impl ApiErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            413 => ApiErrorKind::PayloadTooLarge,
            415 => ApiErrorKind::UnsupportedMediaType,
            429 => ApiErrorKind::TooManyRequests,
            502 => ApiErrorKind::BadGateway,
            _ => ApiErrorKind::Unexpected,
        }
    }

    /// The service's documented meaning of this status.
    pub fn description(&self) -> &'static str {
        match self {
            ApiErrorKind::BadRequest => {
                "A required parameter is missing, empty, or null. Or, the value passed to either a required or optional parameter is invalid. A common issue is a header that is too long"
            }
            ApiErrorKind::Unauthorized => {
                "The request is not authorized. Check to make sure your subscription key or token is valid and in the correct region"
            }
            ApiErrorKind::PayloadTooLarge => "The SSML input is longer than 1024 characters",
            ApiErrorKind::UnsupportedMediaType => {
                "It's possible that the wrong Content-Type was provided. Content-Type should be set to application/ssml+xml"
            }
            ApiErrorKind::TooManyRequests => {
                "You have exceeded the quota or rate of requests allowed for your subscription"
            }
            ApiErrorKind::BadGateway => {
                "Network or server-side issue. May also indicate invalid headers"
            }
            ApiErrorKind::Unexpected => "Received unexpected HTTP status code",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::BadRequest => write!(f, "bad request"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::PayloadTooLarge => write!(f, "payload too large"),
            ApiErrorKind::UnsupportedMediaType => write!(f, "unsupported media type"),
            ApiErrorKind::TooManyRequests => write!(f, "too many requests"),
            ApiErrorKind::BadGateway => write!(f, "bad gateway"),
            ApiErrorKind::Unexpected => write!(f, "unexpected status"),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Authentication errors.
///
/// These errors occur while exchanging the subscription key for a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status
    #[error("Token endpoint {endpoint} returned unexpected status {status_code}")]
    UnexpectedStatus {
        /// Token endpoint URL
        endpoint: String,
        /// HTTP status code returned
        status_code: u16,
    },

    /// The token endpoint could not be reached
    #[error("Token request to {endpoint} failed: {message}")]
    Request {
        /// Token endpoint URL
        endpoint: String,
        /// Transport error message
        message: String,
    },
}

impl AuthError {
    /// Create a new unexpected status error.
    pub fn unexpected_status(endpoint: impl Into<String>, status_code: u16) -> Self {
        AuthError::UnexpectedStatus {
            endpoint: endpoint.into(),
            status_code,
        }
    }

    /// Create a new request failure error.
    pub fn request(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        AuthError::Request {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_includes_endpoint_and_status() {
        let err = Error::api("https://eastus.tts.speech.microsoft.com/cognitiveservices/v1", 400);
        let msg = err.to_string();
        assert!(msg.contains("eastus.tts.speech.microsoft.com"), "Should contain endpoint");
        assert!(msg.contains("400"), "Should contain status code");
        assert!(msg.contains("required parameter"), "Should contain description");
    }

    #[test]
    fn test_api_error_kinds() {
        let cases = [
            (400, ApiErrorKind::BadRequest),
            (401, ApiErrorKind::Unauthorized),
            (413, ApiErrorKind::PayloadTooLarge),
            (415, ApiErrorKind::UnsupportedMediaType),
            (429, ApiErrorKind::TooManyRequests),
            (502, ApiErrorKind::BadGateway),
            (418, ApiErrorKind::Unexpected),
            (500, ApiErrorKind::Unexpected),
        ];
        for (status, expected) in cases {
            assert_eq!(ApiErrorKind::from_status(status), expected, "status {}", status);
        }
    }

    #[test]
    fn test_status_code_accessor() {
        assert_eq!(Error::api("x", 413).status_code(), Some(413));
        assert_eq!(
            Error::from(AuthError::unexpected_status("x", 401)).status_code(),
            Some(401)
        );
        assert_eq!(Error::timeout(Duration::from_secs(30)).status_code(), None);
        assert_eq!(Error::Cancelled.status_code(), None);
    }

    #[test]
    fn test_timeout_keeps_subsecond_precision() {
        let err = Error::timeout(Duration::from_millis(500));
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(500)));
        assert_eq!(err.to_string(), "Operation timed out after 500ms");
    }

    #[test]
    fn test_config_error_includes_var_name() {
        let err = ConfigError::missing_env_var("AZUREKEY");
        assert!(err.to_string().contains("AZUREKEY"));
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::missing_env_var("TEST_VAR").into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_from_auth_error() {
        let err: Error = AuthError::request("https://token", "connection refused").into();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_unsupported_voice_error() {
        let err = Error::unsupported_voice("de-CH", "Female");
        let msg = err.to_string();
        assert!(msg.contains("de-CH"));
        assert!(msg.contains("Female"));
    }

    #[test]
    fn test_api_error_kind_display() {
        assert_eq!(ApiErrorKind::Unauthorized.to_string(), "unauthorized");
        assert_eq!(ApiErrorKind::TooManyRequests.to_string(), "too many requests");
        assert_eq!(ApiErrorKind::Unexpected.to_string(), "unexpected status");
    }
}
