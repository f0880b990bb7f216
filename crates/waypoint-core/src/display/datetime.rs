//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp in the system time zone as `YYYY-MM-DD HH:MM TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// A due date with the time left (or past) relative to `now`, e.g.
/// `2025-03-11 09:00 UTC (in 23h)` or `... (3h overdue)`.
pub struct DueLabel<'a> {
    pub due: &'a Timestamp,
    pub now: Timestamp,
}

impl<'a> DueLabel<'a> {
    /// Labels `due` relative to the current time.
    pub fn now(due: &'a Timestamp) -> Self {
        Self {
            due,
            now: Timestamp::now(),
        }
    }
}

impl fmt::Display for DueLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LocalDateTime(self.due))?;

        let hours = self.now.duration_until(*self.due).as_hours();
        match hours {
            h if h > 0 => write!(f, " (in {h}h)"),
            h if h < 0 => write!(f, " ({}h overdue)", -h),
            _ if self.now > *self.due => write!(f, " (just overdue)"),
            _ => write!(f, " (due within the hour)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn test_due_label_relative_hours() {
        let now: Timestamp = "2025-03-10T09:00:00Z".parse().expect("timestamp");
        let later = now + SignedDuration::from_hours(23);
        let earlier = now - SignedDuration::from_hours(3);

        assert!(DueLabel { due: &later, now }.to_string().ends_with("(in 23h)"));
        assert!(DueLabel { due: &earlier, now }
            .to_string()
            .ends_with("(3h overdue)"));
    }
}
