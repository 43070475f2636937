//! Countdown arithmetic for decision deadlines.

use crate::error::CoreError;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Below this distance from the deadline a decision counts as urgent.
pub const URGENT_WINDOW_MS: i64 = 60 * MS_PER_SECOND;

/// Time left until (or past) a deadline, broken down for display.
///
/// Always derived fresh from a `now`; callers refreshing a live countdown
/// call [`Countdown::between`] again on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Absolute distance to the deadline in milliseconds.
    pub magnitude_ms: i64,
    pub is_overdue: bool,
    pub is_urgent: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn between(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = deadline.signed_duration_since(now).num_milliseconds();
        let abs = diff.saturating_abs();
        Self {
            magnitude_ms: abs,
            is_overdue: deadline < now,
            is_urgent: abs < URGENT_WINDOW_MS,
            days: abs / MS_PER_DAY,
            hours: (abs % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (abs % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (abs % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Compact form such as `2d 03:04:05` or `-00:00:12` when overdue.
    pub fn display(&self) -> String {
        let sign = if self.is_overdue { "-" } else { "" };
        if self.days > 0 {
            format!(
                "{}{}d {:02}:{:02}:{:02}",
                sign, self.days, self.hours, self.minutes, self.seconds
            )
        } else {
            format!("{}{:02}:{:02}:{:02}", sign, self.hours, self.minutes, self.seconds)
        }
    }
}

/// `start + minutes`, rejecting results outside the representable range.
pub fn deadline_after(start: DateTime<Utc>, minutes: u32) -> Result<DateTime<Utc>, CoreError> {
    start
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
        .ok_or_else(|| {
            CoreError::InvalidDeadline(format!("{} + {} minutes is out of range", start, minutes))
        })
}

/// Parse an RFC 3339 deadline supplied by the user.
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidDeadline(format!("'{}': {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn future_deadline_breakdown() {
        let deadline = now() + Duration::days(2) + Duration::hours(3) + Duration::minutes(4)
            + Duration::seconds(5);
        let c = Countdown::between(deadline, now());
        assert!(!c.is_overdue);
        assert!(!c.is_urgent);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (2, 3, 4, 5));
        assert_eq!(c.display(), "2d 03:04:05");
    }

    #[test]
    fn overdue_uses_absolute_difference() {
        let deadline = now() - Duration::hours(1) - Duration::seconds(30);
        let c = Countdown::between(deadline, now());
        assert!(c.is_overdue);
        assert!(!c.is_urgent);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (0, 1, 0, 30));
        assert_eq!(c.display(), "-01:00:30");
    }

    #[test]
    fn urgent_on_both_sides_of_deadline() {
        let soon = Countdown::between(now() + Duration::seconds(59), now());
        assert!(soon.is_urgent);
        assert!(!soon.is_overdue);

        let just_past = Countdown::between(now() - Duration::seconds(10), now());
        assert!(just_past.is_urgent);
        assert!(just_past.is_overdue);

        let minute = Countdown::between(now() + Duration::seconds(60), now());
        assert!(!minute.is_urgent);
    }

    #[test]
    fn exactly_at_deadline_is_not_overdue() {
        let c = Countdown::between(now(), now());
        assert!(!c.is_overdue);
        assert!(c.is_urgent);
        assert_eq!(c.magnitude_ms, 0);
    }

    #[test]
    fn deadline_after_adds_minutes() {
        assert_eq!(deadline_after(now(), 1440).unwrap(), now() + Duration::days(1));
    }

    #[test]
    fn deadline_after_rejects_overflow() {
        let end = DateTime::<Utc>::MAX_UTC;
        assert!(matches!(
            deadline_after(end, 10),
            Err(CoreError::InvalidDeadline(_))
        ));
    }

    #[test]
    fn parse_deadline_validates() {
        let parsed = parse_deadline("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(parsed, now());
        assert!(parse_deadline("tomorrow").is_err());
    }
}
