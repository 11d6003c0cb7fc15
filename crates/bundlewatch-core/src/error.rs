// ── Core error types ──
//
// Every failure the accounting engine can produce. The engine never logs
// and never recovers -- callers treat any of these as "this refresh cycle
// failed" and keep displaying the previous summary.

use thiserror::Error;

/// Unified error type for the accounting engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input text (unit string or usage-monitor line).
    #[error("Cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// An expected field is absent from the balance record.
    #[error("Balance record is missing field '{field}'")]
    MissingField { field: &'static str },

    /// No balance detail entry matched the off-peak service marker.
    #[error("No balance detail entry with service type '{marker}'")]
    NoOffPeakBundle { marker: &'static str },

    /// Division by zero (or similarly degenerate arithmetic) in the
    /// quota calculation.
    #[error("Quota computation failed: {message}")]
    Computation { message: String },
}

impl CoreError {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
