//! Wall-clock time of day at which a job fires.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveTime, TimeZone};

/// Raised when a check time is not `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day {raw:?}: expected HH:MM")]
pub struct ScheduleParseError {
    raw: String,
}

/// Fires once a day at a fixed local time.
///
/// # Examples
/// ```
/// use itam::inbound::scheduler::DailySchedule;
///
/// let schedule = DailySchedule::parse("09:30").expect("valid time");
/// assert_eq!(schedule.to_string(), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub const fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Parse an `HH:MM` string.
    pub fn parse(raw: &str) -> Result<Self, ScheduleParseError> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map(Self::new)
            .map_err(|_| ScheduleParseError {
                raw: raw.to_owned(),
            })
    }

    /// First occurrence strictly after `now`, in `now`'s time zone.
    ///
    /// A time that does not exist on a given day (a DST gap) moves to the
    /// next day; an ambiguous one resolves to the earlier instant.
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        (0..=2)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter_map(|day| tz.from_local_datetime(&day.and_time(self.at)).earliest())
            .find(|candidate| candidate > now)
            .unwrap_or_else(|| now.clone() + chrono::Duration::days(1))
    }
}

impl FromStr for DailySchedule {
    type Err = ScheduleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%H:%M"))
    }
}
