//! Human readable "time left" strings for bet expiry.

use chrono::{DateTime, Utc};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

fn unit(count: i64, singular: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

fn round_div(value: i64, by: i64) -> i64 {
    (value as f64 / by as f64).round() as i64
}

/// Distance between two instants in words, direction ignored
/// ("less than a minute", "about 3 hours", "over 1 year", ...).
pub fn format_distance(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().abs();
    let minutes = round_div(seconds, 60);

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            unit(minutes, "minute")
        };
    }
    if minutes < 45 {
        return unit(minutes, "minute");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        return format!("about {}", unit(round_div(minutes, 60), "hour"));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        return unit(round_div(minutes, MINUTES_IN_DAY), "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        return format!("about {}", unit(round_div(minutes, MINUTES_IN_MONTH), "month"));
    }

    let months = minutes / MINUTES_IN_MONTH;
    if months < 12 {
        return unit(round_div(minutes, MINUTES_IN_MONTH), "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", unit(years, "year")),
        3..=8 => format!("over {}", unit(years, "year")),
        _ => format!("almost {}", unit(years + 1, "year")),
    }
}

/// "about 2 hours left"
pub fn format_time_left(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} left", format_distance(now, expires_at))
}

/// Compact countdown: "2d 3h", "5h 12m", "9m" or "Expired".
pub fn short_time_left(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = expires_at - now;
    if diff.num_milliseconds() <= 0 {
        return "Expired".to_string();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_distance_buckets() {
        let cases = [
            (Duration::seconds(20), "less than a minute"),
            (Duration::seconds(70), "1 minute"),
            (Duration::minutes(10), "10 minutes"),
            (Duration::minutes(60), "about 1 hour"),
            (Duration::hours(2), "about 2 hours"),
            (Duration::hours(30), "1 day"),
            (Duration::days(3), "3 days"),
            (Duration::days(35), "about 1 month"),
            (Duration::days(100), "3 months"),
            (Duration::days(370), "about 1 year"),
            (Duration::days(550), "over 1 year"),
            (Duration::days(700), "almost 2 years"),
        ];
        for (offset, expected) in cases {
            assert_eq!(format_distance(now(), now() + offset), expected, "offset {:?}", offset);
        }
    }

    #[test]
    fn test_distance_ignores_direction() {
        assert_eq!(format_distance(now(), now() - Duration::hours(2)), "about 2 hours");
    }

    #[test]
    fn test_format_time_left_suffix() {
        assert_eq!(format_time_left(now() + Duration::hours(2), now()), "about 2 hours left");
    }

    #[test]
    fn test_short_time_left() {
        assert_eq!(short_time_left(now() - Duration::minutes(1), now()), "Expired");
        assert_eq!(short_time_left(now(), now()), "Expired");
        assert_eq!(short_time_left(now() + Duration::hours(51), now()), "2d 3h");
        assert_eq!(short_time_left(now() + Duration::minutes(312), now()), "5h 12m");
        assert_eq!(short_time_left(now() + Duration::minutes(9), now()), "9m");
    }
}
