//! Store freshness: delay labels and the synced/late classification.

use chrono::{DateTime, TimeZone, Utc};

const UPDATED: &str = "Updated";

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{n} {unit}s")
    } else {
        format!("{n} {unit}")
    }
}

/// Human-readable delay for a store row.
///
/// Whole days win over hours. Hours are rounded to the nearest minute and
/// split into hours and minutes. Zero, negative and NaN delays read as
/// "Updated".
pub fn format_delay(delay_hours: f64, delay_days: i32) -> String {
    if delay_days > 0 {
        return plural(i64::from(delay_days), "day");
    }

    if delay_hours > 0.0 {
        let total_minutes = (delay_hours * 60.0).round() as i64;
        if total_minutes == 0 {
            return UPDATED.to_string();
        }

        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        let mut parts = Vec::with_capacity(2);
        if hours > 0 {
            parts.push(plural(hours, "hour"));
        }
        if minutes > 0 {
            parts.push(plural(minutes, "minute"));
        }
        return parts.join(" and ");
    }

    UPDATED.to_string()
}

/// Badge text for a store row.
pub fn sync_label(is_synced: bool) -> &'static str {
    if is_synced {
        "Synced"
    } else {
        "Late"
    }
}

/// Freshness of one store as computed at collection time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Freshness {
    pub is_synced: bool,
    pub delay_hours: f64,
    pub delay_days: i32,
}

/// Classify a store's last update against the collection time.
///
/// A store is synced when its last update falls on the collection day in
/// `now`'s timezone. Otherwise the delay runs from the start of that day
/// back to the update; hours are kept to two decimals. A store that never
/// reported is late with no measurable delay.
pub fn classify_freshness<Tz: TimeZone>(
    updated_at: Option<DateTime<Utc>>,
    now: &DateTime<Tz>,
) -> Freshness {
    let Some(updated_at) = updated_at else {
        return Freshness {
            is_synced: false,
            delay_hours: 0.0,
            delay_days: 0,
        };
    };

    let tz = now.timezone();
    let today = now.date_naive();
    let local_update = updated_at.with_timezone(&tz);

    if local_update.date_naive() == today {
        return Freshness {
            is_synced: true,
            delay_hours: 0.0,
            delay_days: 0,
        };
    }

    let start_of_day = today
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(updated_at);

    let delay = start_of_day - updated_at;
    if delay <= chrono::Duration::zero() {
        // Updated after the collection day started but dated in the future.
        return Freshness {
            is_synced: false,
            delay_hours: 0.0,
            delay_days: 0,
        };
    }

    let hours = delay.num_seconds() as f64 / 3600.0;
    Freshness {
        is_synced: false,
        delay_hours: (hours * 100.0).round() / 100.0,
        delay_days: delay.num_days() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn days_win_over_hours() {
        assert_eq!(format_delay(30.0, 1), "1 day");
        assert_eq!(format_delay(0.0, 2), "2 days");
        assert_eq!(format_delay(99.9, 14), "14 days");
    }

    #[test]
    fn zero_delay_is_updated() {
        assert_eq!(format_delay(0.0, 0), "Updated");
    }

    #[test]
    fn hours_and_minutes_join() {
        assert_eq!(format_delay(1.5, 0), "1 hour and 30 minutes");
        assert_eq!(format_delay(2.0, 0), "2 hours");
        assert_eq!(format_delay(0.5, 0), "30 minutes");
        assert_eq!(format_delay(2.0 + 1.0 / 60.0, 0), "2 hours and 1 minute");
    }

    #[test]
    fn sub_minute_delay_rounds_to_updated() {
        assert_eq!(format_delay(0.001, 0), "Updated");
    }

    #[test]
    fn negative_and_nan_read_as_updated() {
        assert_eq!(format_delay(-3.0, 0), "Updated");
        assert_eq!(format_delay(f64::NAN, 0), "Updated");
        assert_eq!(format_delay(1.0, -1), "1 hour");
    }

    #[test]
    fn labels() {
        assert_eq!(sync_label(true), "Synced");
        assert_eq!(sync_label(false), "Late");
    }

    fn sao_paulo_now() -> DateTime<FixedOffset> {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        tz.with_ymd_and_hms(2026, 10, 16, 14, 0, 0).unwrap()
    }

    #[test]
    fn update_today_is_synced() {
        // 09:00 local on the collection day.
        let updated = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let f = classify_freshness(Some(updated), &sao_paulo_now());
        assert!(f.is_synced);
        assert_eq!(f.delay_days, 0);
    }

    #[test]
    fn update_yesterday_is_late_from_midnight() {
        // 18:30 local the day before: 5.5 hours before local midnight.
        let updated = Utc.with_ymd_and_hms(2026, 10, 15, 21, 30, 0).unwrap();
        let f = classify_freshness(Some(updated), &sao_paulo_now());
        assert!(!f.is_synced);
        assert_eq!(f.delay_hours, 5.5);
        assert_eq!(f.delay_days, 0);
        assert_eq!(format_delay(f.delay_hours, f.delay_days), "5 hours and 30 minutes");
    }

    #[test]
    fn update_days_ago_counts_days() {
        let updated = Utc.with_ymd_and_hms(2026, 10, 12, 3, 0, 0).unwrap();
        let f = classify_freshness(Some(updated), &sao_paulo_now());
        assert!(!f.is_synced);
        assert_eq!(f.delay_days, 4);
    }

    #[test]
    fn never_reported_is_late() {
        let f = classify_freshness(None, &sao_paulo_now());
        assert!(!f.is_synced);
        assert_eq!(f.delay_hours, 0.0);
    }
}
