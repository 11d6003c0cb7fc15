// ── Usage summary: pipeline and renderings ──
//
// `UsageSummary` is the one value the rest of the application cares
// about. It is an immutable snapshot per refresh cycle: the shell only
// replaces its previous summary once `compile_summary` has succeeded in
// full, so a failed cycle can never partially overwrite a good one.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::balance::{BalanceRecord, get_available_data};
use crate::error::CoreError;
use crate::quota::calculate_daily_quota_and_usage;
use crate::units::human_readable;
use crate::usage::{parse_hourly_usage, split_data_usage};

/// The computed result of one refresh cycle. Quantities are KiB.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub peak_available: f64,
    pub off_peak_available: f64,
    pub peak_usage: f64,
    pub off_peak_usage: f64,
    /// Peak balance spread over the days left in the billing month.
    pub daily_peak_remaining: f64,
    /// Today's peak usage as a fraction of `daily_peak_remaining`.
    /// Only meaningful when `daily_peak_remaining > 0`, which
    /// [`compile_summary`] guarantees.
    pub peak_usage_percentage: f64,
    pub last_update: DateTime<Local>,
}

/// Compile a [`UsageSummary`] from one cycle's raw inputs.
///
/// The single deterministic pipeline over (balance record, monitor
/// output, current time): extract available balances, window today's
/// samples into peak/off-peak, then derive the daily budget and usage
/// fraction. Sample classification uses `now`'s timezone; "today" is
/// `now`'s calendar date. Any failure aborts the whole cycle.
pub fn compile_summary<Tz: TimeZone>(
    record: &BalanceRecord,
    usage_text: &str,
    now: &DateTime<Tz>,
) -> Result<UsageSummary, CoreError> {
    let today = now.date_naive();

    let samples = parse_hourly_usage(usage_text)?;
    let (peak_usage, off_peak_usage) = split_data_usage(&samples, today, &now.timezone());
    let (peak_available, off_peak_available) = get_available_data(record)?;

    #[allow(clippy::cast_precision_loss)]
    let (peak_usage, off_peak_usage) = (peak_usage as f64, off_peak_usage as f64);

    let (daily_peak_remaining, peak_usage_percentage) =
        calculate_daily_quota_and_usage(today, peak_available, peak_usage)?;

    Ok(UsageSummary {
        peak_available,
        off_peak_available,
        peak_usage,
        off_peak_usage,
        daily_peak_remaining,
        peak_usage_percentage,
        last_update: now.with_timezone(&Local),
    })
}

impl UsageSummary {
    /// Fixed-width banner block for console display.
    pub fn console_block(&self) -> String {
        let usage = format!("{:.1}%", self.peak_usage_percentage * 100.0);
        format!(
            "============ Peak ============\n\
             Available:      {:>14}\n\
             Per day:        {:>14}\n\
             Today:          {:>14}\n\
             Usage:          {:>14}\n\
             ========== Off-Peak ==========\n\
             Available:      {:>14}\n\
             Today:          {:>14}\n\
             ==============================",
            human_readable(self.peak_available),
            human_readable(self.daily_peak_remaining),
            human_readable(self.peak_usage),
            usage,
            human_readable(self.off_peak_available),
            human_readable(self.off_peak_usage),
        )
    }

    /// Short multi-line form, ending with the last-update timestamp.
    pub fn brief(&self) -> String {
        format!(
            "Peak\n\
             Available: {}\n\
             Per day: {}\n\
             Today: {}\n\
             Usage: {:.1}%\n\
             \n\
             Off-Peak\n\
             Available: {}\n\
             Today: {}\n\
             \n\
             Last Update: {}",
            human_readable(self.peak_available),
            human_readable(self.daily_peak_remaining),
            human_readable(self.peak_usage),
            self.peak_usage_percentage * 100.0,
            human_readable(self.off_peak_available),
            human_readable(self.off_peak_usage),
            self.last_update.format("%x %X"),
        )
    }

    /// Single-line comma-joined form for log scraping.
    ///
    /// Field order and presence are a compatibility contract with
    /// external tooling:
    /// `peak_available,daily_peak_remaining,peak_usage,peak_usage_percentage,off_peak_available,off_peak_usage`
    /// The percentage is a plain fraction, not multiplied by 100.
    pub fn audit_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.peak_available,
            self.daily_peak_remaining,
            self.peak_usage,
            self.peak_usage_percentage,
            self.off_peak_available,
            self.off_peak_usage,
        )
    }
}
