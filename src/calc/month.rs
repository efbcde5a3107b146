//! Salary month ("YYYY-MM") parsing and the active-day window used for
//! hire/termination proration.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("salary month must be formatted YYYY-MM, got '{0}'")]
pub struct MonthParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryMonth {
    year: i32,
    month: u32,
}

impl SalaryMonth {
    pub fn parse(raw: &str) -> Result<Self, MonthParseError> {
        let bad = || MonthParseError(raw.to_string());
        let (y, m) = raw.split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(bad());
        }
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) {
            return Err(bad());
        }
        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated at parse")
    }

    pub fn last_day(&self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.expect("validated at parse").pred_opt().expect("month start has predecessor")
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Days of the month the employee was on the books: the overlap of
    /// [hire, termination] with the month, inclusive on both ends. Zero when
    /// the ranges do not intersect.
    pub fn active_days(&self, hire_date: NaiveDate, termination_date: Option<NaiveDate>) -> i64 {
        let from = self.first_day().max(hire_date);
        let to = termination_date
            .map(|t| t.min(self.last_day()))
            .unwrap_or_else(|| self.last_day());
        if to < from {
            return 0;
        }
        (to - from).num_days() + 1
    }
}

impl fmt::Display for SalaryMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert_eq!(m.to_string(), "2026-01");
        assert_eq!(m.first_day(), d(2026, 1, 1));
        assert_eq!(m.last_day(), d(2026, 1, 31));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["2026", "2026-13", "2026-00", "26-01", "2026-1", "2026/01", "abcd-ef"] {
            assert!(SalaryMonth::parse(raw).is_err(), "accepted '{raw}'");
        }
    }

    #[test]
    fn test_last_day_december() {
        let m = SalaryMonth::parse("2025-12").unwrap();
        assert_eq!(m.last_day(), d(2025, 12, 31));
    }

    #[test]
    fn test_last_day_leap_february() {
        let m = SalaryMonth::parse("2028-02").unwrap();
        assert_eq!(m.last_day(), d(2028, 2, 29));
    }

    #[test]
    fn test_active_days_full_month() {
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert_eq!(m.active_days(d(2020, 5, 1), None), 31);
    }

    #[test]
    fn test_active_days_mid_month_hire() {
        // Hired on the 15th of a 31-day January: 17 active days.
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert_eq!(m.active_days(d(2026, 1, 15), None), 17);
    }

    #[test]
    fn test_active_days_mid_month_termination() {
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert_eq!(m.active_days(d(2020, 5, 1), Some(d(2026, 1, 15))), 15);
    }

    #[test]
    fn test_active_days_outside_month() {
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert_eq!(m.active_days(d(2026, 2, 1), None), 0);
        assert_eq!(m.active_days(d(2020, 1, 1), Some(d(2025, 12, 31))), 0);
    }

    #[test]
    fn test_contains() {
        let m = SalaryMonth::parse("2026-01").unwrap();
        assert!(m.contains(d(2026, 1, 31)));
        assert!(!m.contains(d(2026, 2, 1)));
    }
}
