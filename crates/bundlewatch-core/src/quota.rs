// ── Daily quota calculation ──

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

/// Number of days left in `date`'s month, counting `date` itself.
fn days_remaining_in_month(date: NaiveDate) -> i64 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let end_of_month = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always valid")
        .pred_opt()
        .expect("month start has a predecessor");
    (end_of_month - date).num_days() + 1
}

/// Compute `(daily_remaining, usage_fraction)` for today.
///
/// `daily_remaining` spreads `available` evenly over the days left in the
/// billing month (today included). `usage_fraction` is `consumed_today`
/// relative to that budget, as a plain fraction.
///
/// The `+1` on days remaining means the divisor can only hit zero through
/// caller error (a date that isn't really "today"), but both divisions are
/// guarded: a zero budget surfaces as [`CoreError::Computation`], never as
/// an infinite or NaN fraction.
pub fn calculate_daily_quota_and_usage(
    today: NaiveDate,
    available: f64,
    consumed_today: f64,
) -> Result<(f64, f64), CoreError> {
    let days_remaining = days_remaining_in_month(today);
    if days_remaining <= 0 {
        return Err(CoreError::Computation {
            message: format!("no days remaining in month for {today}"),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let daily_remaining = available / days_remaining as f64;
    if daily_remaining == 0.0 {
        return Err(CoreError::Computation {
            message: "daily budget is zero; usage fraction is undefined".into(),
        });
    }

    let usage_fraction = consumed_today / daily_remaining;
    Ok((daily_remaining, usage_fraction))
}
