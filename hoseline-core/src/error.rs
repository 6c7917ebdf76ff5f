//! Transport-level failures reported by routing and elevation providers.

use thiserror::Error;

/// A provider could not produce an answer.
///
/// This is distinct from a *negative* answer such as "no route": it means the
/// provider itself was unreachable, slow, refused the request or replied with
/// something unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was called.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The provider answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Endpoint that was called.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Endpoint that was called.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The provider answered but reported an error of its own.
    #[error("provider reported {code}: {message}")]
    Service {
        /// Provider-specific error code.
        code: String,
        /// Provider-supplied description.
        message: String,
    },
    /// The response could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

impl ProviderError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Timeouts, connection failures, `408`, `429` and `5xx` statuses are
    /// transient. Authentication failures, malformed replies and
    /// provider-side rejections are not.
    ///
    /// # Examples
    /// ```
    /// use hoseline_core::ProviderError;
    ///
    /// let busy = ProviderError::Http {
    ///     url: "http://osrm".into(),
    ///     status: 503,
    ///     message: "unavailable".into(),
    /// };
    /// assert!(busy.is_transient());
    /// ```
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Http { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            Self::Service { .. } | Self::Parse { .. } => false,
        }
    }
}
