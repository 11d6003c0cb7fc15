use thiserror::Error;

/// Top-level error type for the `bundlewatch-api` crate.
///
/// Covers both collaborators: the carrier HTTP client and the local
/// usage-monitor subprocess. The CLI maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session token is missing/expired.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Carrier API ─────────────────────────────────────────────────
    /// Non-success response from the carrier API.
    #[error("Carrier API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed, with a body preview for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Usage monitor ───────────────────────────────────────────────
    /// The local usage-monitor command failed.
    #[error("Usage monitor failed: {message}")]
    Monitor { message: String },

    /// Failed to spawn or read the usage-monitor process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
            || matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next refresh cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Monitor { .. } => true,
            _ => false,
        }
    }
}
