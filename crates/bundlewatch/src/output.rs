//! Output formatting: console block, table, brief, JSON, plain.
//!
//! The string renderings themselves live on `UsageSummary` in the core;
//! this module dispatches on `--output` and adds the tabled form.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use bundlewatch_core::{UsageSummary, human_readable};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Window")]
    window: &'static str,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Per day")]
    per_day: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

fn render_table(summary: &UsageSummary, color: bool) -> String {
    let pct = summary.peak_usage_percentage * 100.0;
    let usage = format!("{pct:.1}%");
    let usage = if color {
        if summary.peak_usage_percentage >= 1.0 {
            usage.red().to_string()
        } else {
            usage.green().to_string()
        }
    } else {
        usage
    };

    let rows = vec![
        SummaryRow {
            window: "Peak",
            available: human_readable(summary.peak_available),
            per_day: human_readable(summary.daily_peak_remaining),
            today: human_readable(summary.peak_usage),
            usage,
        },
        SummaryRow {
            window: "Off-peak",
            available: human_readable(summary.off_peak_available),
            per_day: String::new(),
            today: human_readable(summary.off_peak_usage),
            usage: String::new(),
        },
    ];
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render a summary in the chosen format.
pub fn render_summary(summary: &UsageSummary, format: &OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Console => summary.console_block(),
        OutputFormat::Table => render_table(summary, color),
        OutputFormat::Brief => summary.brief(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(summary).expect("serialization should not fail")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(summary).expect("serialization should not fail")
        }
        OutputFormat::Plain => summary.audit_line(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn summary() -> UsageSummary {
        UsageSummary {
            peak_available: 300.0,
            off_peak_available: 500.0,
            peak_usage: 30.0,
            off_peak_usage: 20.0,
            daily_peak_remaining: 300.0,
            peak_usage_percentage: 0.1,
            last_update: chrono::Local.with_ymd_and_hms(2013, 11, 30, 14, 0, 0).unwrap(),
        }
    }

    #[test]
    fn plain_is_the_audit_line() {
        let out = render_summary(&summary(), &OutputFormat::Plain, false);
        assert_eq!(out, "300,300,30,0.1,500,20");
    }

    #[test]
    fn json_round_trips_the_fields() {
        let out = render_summary(&summary(), &OutputFormat::JsonCompact, false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["peak_available"], 300.0);
        assert_eq!(value["peak_usage_percentage"], 0.1);
    }

    #[test]
    fn table_lists_both_windows() {
        let out = render_summary(&summary(), &OutputFormat::Table, false);
        assert!(out.contains("Peak"));
        assert!(out.contains("Off-peak"));
        assert!(out.contains("10.0%"));
    }
}
