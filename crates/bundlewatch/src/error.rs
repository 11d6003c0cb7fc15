//! CLI error types with miette diagnostics.
//!
//! Maps collaborator and engine errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bundlewatch_config::ConfigError;
use bundlewatch_core::CoreError;

/// Exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No config file found at {path}")]
    #[diagnostic(
        code(bundlewatch::no_config),
        help("Create one with: bundlewatch config init")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(bundlewatch::config))]
    Config(#[from] ConfigError),

    // ── Connection / authentication ──────────────────────────────────
    #[error("Could not reach the carrier at {url}")]
    #[diagnostic(
        code(bundlewatch::connection_failed),
        help("Check your network connection and the configured host URL.")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(bundlewatch::auth_failed),
        help("Verify username, password and msisdn in your config.")
    )]
    AuthFailed { message: String },

    // ── Collaborators / engine ───────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bundlewatch::api))]
    Api(bundlewatch_api::Error),

    #[error(transparent)]
    #[diagnostic(code(bundlewatch::core))]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    #[diagnostic(code(bundlewatch::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Classify an API-layer error, attaching the carrier URL to
    /// connection failures.
    pub fn from_api(url: &url::Url, err: bundlewatch_api::Error) -> Self {
        match err {
            bundlewatch_api::Error::Authentication { message } => Self::AuthFailed { message },
            bundlewatch_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                Self::ConnectionFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
            other => Self::Api(other),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config(_) => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Api(_) | Self::Core(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}
