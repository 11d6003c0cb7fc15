// ── Binary unit conversion ──
//
// Quantities are carried internally as KiB (the carrier API's base unit)
// and only formatted into larger units at presentation time.

use crate::error::CoreError;

/// Format a KiB quantity as a human-readable string with an auto-selected
/// binary unit, e.g. `2048.0` -> `"2.00 MiB"`.
///
/// The magnitude is divided by 1024 until it falls inside the open
/// interval (-1024, 1024); if it never does, TiB is used regardless.
/// Negative quantities keep their sign (used for error-amount reporting).
pub fn human_readable(kib: f64) -> String {
    let mut value = kib;
    for unit in ["KiB", "MiB", "GiB"] {
        if value < 1024.0 && value > -1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} TiB")
}

/// Parse a `"<number> <unit>"` string back into a KiB quantity.
///
/// Accepts both IEC and SI-spelled suffixes (`MiB`/`MB`), all interpreted
/// as binary multiples of KiB. Anything that isn't exactly two tokens with
/// a known unit is a [`CoreError::Parse`].
pub fn kib_from_human_readable(text: &str) -> Result<f64, CoreError> {
    let mut tokens = text.split_whitespace();
    let (Some(number), Some(unit), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(CoreError::parse(text, "expected \"<number> <unit>\""));
    };

    let value: f64 = number
        .parse()
        .map_err(|_| CoreError::parse(text, format!("invalid number '{number}'")))?;

    let multiplier = match unit {
        "KiB" | "KB" => 1.0,
        "MiB" | "MB" => 1024.0,
        "GiB" | "GB" => 1024.0 * 1024.0,
        "TiB" | "TB" => 1024.0 * 1024.0 * 1024.0,
        _ => return Err(CoreError::parse(text, format!("unknown unit '{unit}'"))),
    };

    Ok(value * multiplier)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_unit_band() {
        assert_eq!(human_readable(512.0), "512.00 KiB");
        assert_eq!(human_readable(2048.0), "2.00 MiB");
        assert_eq!(human_readable(3.5 * 1024.0 * 1024.0), "3.50 GiB");
        assert_eq!(human_readable(1024.0 * 1024.0 * 1024.0), "1.00 TiB");
    }

    #[test]
    fn formats_negative_quantities() {
        assert_eq!(human_readable(-512.0), "-512.00 KiB");
        assert_eq!(human_readable(-2048.0), "-2.00 MiB");
    }

    #[test]
    fn oversized_values_stay_in_tib() {
        assert_eq!(human_readable(2048.0 * 1024.0 * 1024.0 * 1024.0), "2048.00 TiB");
    }

    #[test]
    fn parses_all_unit_spellings() {
        assert_eq!(kib_from_human_readable("512 KiB").unwrap(), 512.0);
        assert_eq!(kib_from_human_readable("512 KB").unwrap(), 512.0);
        assert_eq!(kib_from_human_readable("2.00 MiB").unwrap(), 2048.0);
        assert_eq!(kib_from_human_readable("1 GB").unwrap(), 1024.0 * 1024.0);
        assert_eq!(kib_from_human_readable("1 TiB").unwrap(), 1024.0 * 1024.0 * 1024.0);
    }

    #[test]
    fn rejects_unknown_unit() {
        let result = kib_from_human_readable("5 PiB");
        assert!(matches!(result, Err(CoreError::Parse { .. })));
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert!(kib_from_human_readable("512").is_err());
        assert!(kib_from_human_readable("512 KiB extra").is_err());
        assert!(kib_from_human_readable("").is_err());
    }

    #[test]
    fn rejects_bad_number() {
        assert!(kib_from_human_readable("lots MiB").is_err());
    }

    #[test]
    fn round_trips_within_formatting_precision() {
        for q in [1.0, 512.0, 2048.0, 123_456.0, 3.7e9, -900.0, -5.0e6] {
            let parsed = kib_from_human_readable(&human_readable(q)).unwrap();
            let tolerance = (q.abs() * 0.01).max(0.01);
            assert!(
                (parsed - q).abs() <= tolerance,
                "{q} round-tripped to {parsed}"
            );
        }
    }
}
