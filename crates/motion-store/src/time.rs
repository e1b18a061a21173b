//! UTC calendar dates for baseline save stamps (no chrono dependency).

use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: u64 = 86_400;

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    unix_to_date(now_unix_secs())
}

/// Unix seconds to a `YYYY-MM-DD` UTC date.
pub fn unix_to_date(secs: u64) -> String {
    let (y, m, d) = civil_from_days((secs / SECS_PER_DAY) as i64);
    format!("{y:04}-{m:02}-{d:02}")
}

/// True for strings shaped like `YYYY-MM-DD` with a plausible month and day.
pub fn is_valid_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return false;
    };
    if y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return false;
    }
    matches!(
        (y.parse::<u32>(), m.parse::<u32>(), d.parse::<u32>()),
        (Ok(_), Ok(1..=12), Ok(1..=31))
    )
}

/// Days since the Unix epoch to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u64, u64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe as i64 + era * 400 + if m <= 2 { 1 } else { 0 };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(unix_to_date(0), "1970-01-01");
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29T12:00:00Z
        assert_eq!(unix_to_date(1_709_208_000), "2024-02-29");
    }

    #[test]
    fn test_today_is_valid() {
        let today = today();
        assert!(is_valid_date(&today), "bad date: {today}");
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2026-10-19"));
        assert!(!is_valid_date("2026-13-01"));
        assert!(!is_valid_date("2026-1-01"));
        assert!(!is_valid_date("2026-10-19T00:00:00Z"));
        assert!(!is_valid_date(""));
    }
}
