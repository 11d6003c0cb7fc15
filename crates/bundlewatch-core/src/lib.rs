//! Usage-accounting engine for bundlewatch.
//!
//! Pure, synchronous computations turning one refresh cycle's raw inputs
//! -- a carrier balance record and a local monitor's hourly counters --
//! into the two numbers that matter: how much data is left per remaining
//! day of the billing month, and what fraction of today's peak budget is
//! already gone.
//!
//! - **[`units`]** — KiB quantities to/from human-readable binary units.
//! - **[`usage`]** — vnstat-style sample parsing and peak/off-peak
//!   windowing (off-peak is 00:00-04:59).
//! - **[`balance`]** — serde model of the carrier balance response and
//!   extraction of peak/off-peak availability, across both API
//!   generations.
//! - **[`quota`]** — the daily budget and usage-fraction arithmetic.
//! - **[`summary`]** — [`compile_summary`], the single deterministic
//!   pipeline, plus the three string renderings of a [`UsageSummary`].
//!
//! The engine holds no state between calls and never logs or recovers;
//! every error propagates so the caller can fail the cycle and keep its
//! previous summary.

pub mod balance;
pub mod error;
pub mod quota;
pub mod summary;
pub mod units;
pub mod usage;

// ── Primary re-exports ──────────────────────────────────────────────
pub use balance::{BalanceRecord, OFF_PEAK_MARKER, RemainingQuantity, get_available_data};
pub use error::CoreError;
pub use quota::calculate_daily_quota_and_usage;
pub use summary::{UsageSummary, compile_summary};
pub use units::{human_readable, kib_from_human_readable};
pub use usage::{HourlySample, parse_hourly_usage, split_data_usage};
