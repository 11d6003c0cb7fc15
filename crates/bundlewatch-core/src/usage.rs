// ── Hourly usage samples and peak/off-peak windowing ──
//
// Input is the raw text a vnstat-style monitor emits: one semicolon
// delimited record per hourly bucket. Off-peak is the 00:00-04:59 tariff
// window; everything from 05:00 is peak.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeZone, Timelike};

use crate::error::CoreError;

/// First hour of the peak tariff window.
const PEAK_START_HOUR: u32 = 5;

/// One hourly usage bucket from the local monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlySample {
    /// Unix timestamp of the bucket (seconds).
    pub timestamp: i64,
    /// Counter of data received during the hour.
    pub rx: u64,
    /// Counter of data transmitted during the hour.
    pub tx: u64,
}

impl FromStr for HourlySample {
    type Err = CoreError;

    /// Parse one monitor record: `<tag>;<index>;<unix_ts>;<rx>;<tx>[;...]`.
    ///
    /// Only fields 2, 3 and 4 carry meaning; leading fields are ignored
    /// (see `man vnstat` for the dump format).
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split(';');

        let timestamp = fields
            .nth(2)
            .ok_or_else(|| CoreError::parse(line, "expected at least 5 ';'-delimited fields"))?;
        let rx = fields
            .next()
            .ok_or_else(|| CoreError::parse(line, "missing rx field"))?;
        let tx = fields
            .next()
            .ok_or_else(|| CoreError::parse(line, "missing tx field"))?;

        Ok(Self {
            timestamp: timestamp
                .parse()
                .map_err(|_| CoreError::parse(line, format!("invalid timestamp '{timestamp}'")))?,
            rx: rx
                .parse()
                .map_err(|_| CoreError::parse(line, format!("invalid rx counter '{rx}'")))?,
            tx: tx
                .parse()
                .map_err(|_| CoreError::parse(line, format!("invalid tx counter '{tx}'")))?,
        })
    }
}

/// Parse the monitor's full multi-line output into samples.
///
/// Records are whitespace-separated; blank output yields an empty vec.
pub fn parse_hourly_usage(text: &str) -> Result<Vec<HourlySample>, CoreError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Split today's samples into `(peak, off_peak)` usage totals.
///
/// Keeps only samples whose day-of-month equals `reference_date`'s
/// day-of-month. That is deliberately not a full date comparison: on a
/// month boundary a sample from the same day number of another month
/// would be counted. Long-standing behavior, kept as-is.
///
/// Each retained sample contributes `rx + tx`; hours 0-4 (in `tz`)
/// accumulate into off-peak, hour 5 onward into peak. Samples whose
/// timestamp doesn't resolve in `tz` are skipped.
pub fn split_data_usage<Tz: TimeZone>(
    samples: &[HourlySample],
    reference_date: NaiveDate,
    tz: &Tz,
) -> (u64, u64) {
    let mut peak = 0;
    let mut off_peak = 0;

    for sample in samples {
        let Some(moment) = tz.timestamp_opt(sample.timestamp, 0).single() else {
            continue;
        };
        if moment.day() != reference_date.day() {
            continue;
        }

        let delta = sample.rx + sample.tx;
        if moment.hour() >= PEAK_START_HOUR {
            peak += delta;
        } else {
            off_peak += delta;
        }
    }

    (peak, off_peak)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_at(date: NaiveDate, hour: u32, rx: u64, tx: u64) -> HourlySample {
        let ts = Utc
            .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, 0, 0)
            .unwrap()
            .timestamp();
        HourlySample {
            timestamp: ts,
            rx,
            tx,
        }
    }

    #[test]
    fn parses_vnstat_record() {
        let sample: HourlySample = "h;0;1385769600;2493;1783".parse().unwrap();
        assert_eq!(
            sample,
            HourlySample {
                timestamp: 1_385_769_600,
                rx: 2493,
                tx: 1783,
            }
        );
    }

    #[test]
    fn parses_record_with_trailing_fields() {
        let sample: HourlySample = "h;23;1385769600;10;20;999".parse().unwrap();
        assert_eq!(sample.rx, 10);
        assert_eq!(sample.tx, 20);
    }

    #[test]
    fn rejects_short_record() {
        let result = "h;0;1385769600".parse::<HourlySample>();
        assert!(matches!(result, Err(CoreError::Parse { .. })));
    }

    #[test]
    fn rejects_non_numeric_counter() {
        assert!("h;0;1385769600;abc;1783".parse::<HourlySample>().is_err());
    }

    #[test]
    fn parses_multi_line_output() {
        let text = "h;0;1385769600;1;2\nh;1;1385773200;3;4\n";
        let samples = parse_hourly_usage(text).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn empty_output_is_empty_not_error() {
        assert_eq!(parse_hourly_usage("").unwrap(), vec![]);
        assert_eq!(parse_hourly_usage("  \n ").unwrap(), vec![]);
    }

    #[test]
    fn empty_samples_split_to_zero() {
        let today = NaiveDate::from_ymd_opt(2013, 11, 30).unwrap();
        assert_eq!(split_data_usage(&[], today, &Utc), (0, 0));
    }

    #[test]
    fn splits_off_peak_and_peak_windows() {
        let today = NaiveDate::from_ymd_opt(2013, 11, 30).unwrap();
        let samples = vec![
            sample_at(today, 3, 60, 40),   // off-peak, delta 100
            sample_at(today, 10, 150, 50), // peak, delta 200
        ];
        assert_eq!(split_data_usage(&samples, today, &Utc), (200, 100));
    }

    #[test]
    fn hour_boundaries_classify_correctly() {
        let today = NaiveDate::from_ymd_opt(2013, 11, 30).unwrap();
        let samples = vec![
            sample_at(today, 0, 1, 0),
            sample_at(today, 4, 2, 0),
            sample_at(today, 5, 4, 0),
            sample_at(today, 23, 8, 0),
        ];
        // Hours 0 and 4 are off-peak; 5 and 23 are peak.
        assert_eq!(split_data_usage(&samples, today, &Utc), (12, 3));
    }

    #[test]
    fn other_day_samples_are_excluded() {
        let today = NaiveDate::from_ymd_opt(2013, 11, 30).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2013, 11, 29).unwrap();
        let samples = vec![
            sample_at(yesterday, 10, 500, 500),
            sample_at(today, 10, 30, 70),
        ];
        assert_eq!(split_data_usage(&samples, today, &Utc), (100, 0));
    }

    #[test]
    fn same_day_number_in_another_month_is_counted() {
        // Documented quirk: the filter compares day-of-month only.
        let today = NaiveDate::from_ymd_opt(2013, 11, 15).unwrap();
        let last_month = NaiveDate::from_ymd_opt(2013, 10, 15).unwrap();
        let samples = vec![sample_at(last_month, 10, 100, 0)];
        assert_eq!(split_data_usage(&samples, today, &Utc), (100, 0));
    }

    #[test]
    fn classification_follows_the_given_zone() {
        let today = NaiveDate::from_ymd_opt(2013, 11, 30).unwrap();
        // 04:00 UTC is 06:00 at +02:00 -- peak there, off-peak in UTC.
        let samples = vec![sample_at(today, 4, 100, 0)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(split_data_usage(&samples, today, &Utc), (0, 100));
        assert_eq!(split_data_usage(&samples, today, &plus_two), (100, 0));
    }
}
