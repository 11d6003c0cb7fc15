//! Watch mode: refresh on an interval, keep the last good summary.
//!
//! The loop owns all state between cycles. A failed cycle never touches
//! the previously displayed summary; balance fetches are throttled to
//! roughly once an hour while the local monitor runs every cycle.

use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use bundlewatch_config::Settings;
use bundlewatch_core::{BalanceRecord, UsageSummary, compile_summary};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::commands::refresh::Collaborators;
use crate::error::CliError;
use crate::output;

/// A cached balance record and when it was fetched.
struct RemoteSnapshot {
    fetched_at: DateTime<Local>,
    record: BalanceRecord,
}

/// The remote balances change slowly; refetch only when the hour-of-day
/// has changed since the last successful fetch, or more than an hour has
/// passed.
fn remote_refresh_due(last: &DateTime<Local>, now: &DateTime<Local>) -> bool {
    now.hour() != last.hour() || (*now - *last) > chrono::Duration::hours(1)
}

async fn cycle(
    collaborators: &Collaborators,
    last_remote: &mut Option<RemoteSnapshot>,
    now: &DateTime<Local>,
) -> Result<UsageSummary, CliError> {
    let record = match last_remote.as_ref() {
        Some(snapshot) if !remote_refresh_due(&snapshot.fetched_at, now) => {
            debug!("skipping remote retrieval");
            snapshot.record.clone()
        }
        _ => {
            let record = collaborators.fetch_balances().await?;
            *last_remote = Some(RemoteSnapshot {
                fetched_at: *now,
                record: record.clone(),
            });
            record
        }
    };

    let usage_text = collaborators.fetch_usage().await?;
    Ok(compile_summary(&record, &usage_text, now)?)
}

pub async fn handle(
    settings: &Settings,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let collaborators = Collaborators::new(settings)?;
    let interval = args
        .interval
        .map_or(settings.refresh_interval, Duration::from_secs);

    info!("Watching every {}s", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let color = output::should_color(&global.color);
    let mut last_summary: Option<UsageSummary> = None;
    let mut last_remote: Option<RemoteSnapshot> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                return Ok(());
            }
        }

        let now = Local::now();
        match cycle(&collaborators, &mut last_remote, &now).await {
            Ok(summary) => {
                info!("Audit: {}", summary.audit_line());
                let rendered = output::render_summary(&summary, &global.output, color);
                output::print_output(&rendered, global.quiet);
                last_summary = Some(summary);
            }
            Err(err) => {
                // The cycle failed; the previous summary stays current.
                warn!("Refresh failed, keeping last summary: {err}");
                if let Some(previous) = &last_summary {
                    let rendered = output::render_summary(previous, &global.output, color);
                    output::print_output(&rendered, global.quiet);
                }
            }
        }
    }
}
