//! Inclusive calendar date ranges used for expiry windows.

use chrono::{Days, NaiveDate};

/// Inclusive `[start, end]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Range from `start` to `end`, swapping them if reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// `[today, today + days]`, saturating at the calendar maximum.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use itam::domain::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
    /// let window = DateRange::days_from(today, 3);
    /// assert!(window.contains(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap()));
    /// assert!(!window.contains(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()));
    /// ```
    pub fn days_from(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    /// First day.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day, inclusive.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
