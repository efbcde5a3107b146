//! Time-derived pay metrics: working hours, overtime, lateness, early
//! departure and shortage, all as fixed-point decimals rounded HALF_UP.
//!
//! These functions are pure and never touch storage. Missing optional
//! timestamps produce `None`/zero rather than an error; only the geo
//! validator treats bad input as a defect.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::prelude::*;

use crate::consts::{
    DEFAULT_GRACE_MINUTES, HOUR_DP, OVERTIME_PREMIUM, SHORTAGE_FLOOR_HOURS,
};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const QUARTER_HOUR_MINUTES: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Classification of the attendance day for overtime purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClass {
    Regular,
    Weekend,
    Holiday,
}

impl DayClass {
    pub fn is_premium(self) -> bool {
        matches!(self, DayClass::Weekend | DayClass::Holiday)
    }
}

fn round_hours(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(HOUR_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    Decimal::from((to - from).num_minutes())
}

/// Hours between entry and exit, 2 decimals. `None` when either timestamp
/// is missing; zero when exit precedes or equals entry.
pub fn working_hours(entry: Option<NaiveDateTime>, exit: Option<NaiveDateTime>) -> Option<Decimal> {
    let (entry, exit) = (entry?, exit?);
    if exit <= entry {
        return Some(Decimal::ZERO);
    }
    Some(round_hours(minutes_between(entry, exit) / MINUTES_PER_HOUR))
}

/// Overtime hours. On holidays and weekends every worked hour is overtime at
/// the statutory 1.5 premium, replacing the normal excess-over-schedule rule.
pub fn overtime_hours(working: Decimal, scheduled: Decimal, day: DayClass) -> Decimal {
    if day.is_premium() {
        return round_hours(working * OVERTIME_PREMIUM);
    }
    round_hours((working - scheduled).max(Decimal::ZERO))
}

fn grace_boundary(date: NaiveDate, scheduled_start: NaiveTime, grace_minutes: Option<i64>) -> NaiveDateTime {
    date.and_time(scheduled_start) + Duration::minutes(grace_minutes.unwrap_or(DEFAULT_GRACE_MINUTES))
}

/// Lateness in hours past the grace boundary, 2 decimals. Arrival at or
/// before the boundary is not late.
pub fn delay_hours(entry: NaiveDateTime, scheduled_start: NaiveTime, grace_minutes: Option<i64>) -> Decimal {
    let boundary = grace_boundary(entry.date(), scheduled_start, grace_minutes);
    if entry <= boundary {
        return Decimal::ZERO;
    }
    round_hours(minutes_between(boundary, entry) / MINUTES_PER_HOUR)
}

/// Whole minutes past the grace boundary, for the check-in response.
pub fn late_minutes(entry: NaiveDateTime, scheduled_start: NaiveTime, grace_minutes: Option<i64>) -> i64 {
    let boundary = grace_boundary(entry.date(), scheduled_start, grace_minutes);
    (entry - boundary).num_minutes().max(0)
}

/// Early departure in hours before the scheduled end, 2 decimals.
///
/// The scheduled end moves to the next day only when the shift crosses
/// midnight and the exit actually lands on the following day. An exit at or
/// before the scheduled start means the employee never started work: zero,
/// not a negative value.
pub fn early_out_hours(
    attendance_date: NaiveDate,
    exit: NaiveDateTime,
    scheduled_start: NaiveTime,
    scheduled_end: NaiveTime,
) -> Decimal {
    let start = attendance_date.and_time(scheduled_start);
    let mut end = attendance_date.and_time(scheduled_end);
    if scheduled_end < scheduled_start && exit.date() > attendance_date {
        end += Duration::days(1);
    }
    if exit <= start || exit >= end {
        return Decimal::ZERO;
    }
    round_hours(minutes_between(exit, end) / MINUTES_PER_HOUR)
}

/// Unworked scheduled hours, 2 decimals. Schedules shorter than the
/// 15-minute floor never produce a shortage.
pub fn shortage_hours(scheduled: Decimal, working: Decimal) -> Decimal {
    if scheduled < SHORTAGE_FLOOR_HOURS {
        return Decimal::ZERO;
    }
    round_hours((scheduled - working).max(Decimal::ZERO))
}

/// Hours to whole minutes, HALF_UP.
pub fn hours_to_minutes(hours: Decimal) -> Decimal {
    (hours * MINUTES_PER_HOUR).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Minutes to hours at 2 decimals, HALF_UP.
pub fn minutes_to_hours(minutes: Decimal) -> Decimal {
    round_hours(minutes / MINUTES_PER_HOUR)
}

/// Nearest-15-minutes rounding helper for policy use.
pub fn round_to_quarter_hour(minutes: Decimal) -> Decimal {
    (minutes / QUARTER_HOUR_MINUTES)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * QUARTER_HOUR_MINUTES
}

/// True when the schedule's end-of-day precedes its start, signalling a
/// midnight-crossing shift.
pub fn crosses_midnight(scheduled_start: NaiveTime, scheduled_end: NaiveTime) -> bool {
    scheduled_end < scheduled_start
}

/// Scheduled shift length in hours, 2 decimals. A midnight-crossing shift is
/// (start to 24:00) plus (00:00 to end).
pub fn scheduled_duration_hours(scheduled_start: NaiveTime, scheduled_end: NaiveTime) -> Decimal {
    let start_secs = i64::from(scheduled_start.num_seconds_from_midnight());
    let end_secs = i64::from(scheduled_end.num_seconds_from_midnight());
    let total_secs = if crosses_midnight(scheduled_start, scheduled_end) {
        86_400 - start_secs + end_secs
    } else {
        end_secs - start_secs
    };
    round_hours(Decimal::from(total_secs / 60) / MINUTES_PER_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(2026, 3, day).and_time(t(h, m))
    }

    #[test]
    fn test_working_hours_regular_day() {
        assert_eq!(
            working_hours(Some(dt(2, 8, 0)), Some(dt(2, 17, 0))),
            Some(dec!(9.00))
        );
    }

    #[test]
    fn test_working_hours_crossing_midnight() {
        assert_eq!(
            working_hours(Some(dt(2, 22, 0)), Some(dt(3, 6, 0))),
            Some(dec!(8.00))
        );
    }

    #[test]
    fn test_working_hours_exit_before_entry_is_zero() {
        assert_eq!(
            working_hours(Some(dt(2, 17, 0)), Some(dt(2, 8, 0))),
            Some(Decimal::ZERO)
        );
        assert_eq!(
            working_hours(Some(dt(2, 8, 0)), Some(dt(2, 8, 0))),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_working_hours_unavailable_when_missing() {
        assert_eq!(working_hours(None, Some(dt(2, 17, 0))), None);
        assert_eq!(working_hours(Some(dt(2, 8, 0)), None), None);
        assert_eq!(working_hours(None, None), None);
    }

    #[test]
    fn test_working_hours_rounds_half_up() {
        // 8h 20m = 8.333... -> 8.33
        assert_eq!(
            working_hours(Some(dt(2, 8, 0)), Some(dt(2, 16, 20))),
            Some(dec!(8.33))
        );
        // 8h 21m = 8.35
        assert_eq!(
            working_hours(Some(dt(2, 8, 0)), Some(dt(2, 16, 21))),
            Some(dec!(8.35))
        );
    }

    #[test]
    fn test_overtime_holiday_is_premium_on_all_hours() {
        assert_eq!(
            overtime_hours(dec!(4.00), dec!(8.00), DayClass::Holiday),
            dec!(6.00)
        );
    }

    #[test]
    fn test_overtime_weekend_is_premium_on_all_hours() {
        assert_eq!(
            overtime_hours(dec!(8.00), dec!(8.00), DayClass::Weekend),
            dec!(12.00)
        );
    }

    #[test]
    fn test_overtime_regular_excess_over_schedule() {
        assert_eq!(
            overtime_hours(dec!(10.00), dec!(8.00), DayClass::Regular),
            dec!(2.00)
        );
        assert_eq!(
            overtime_hours(dec!(8.00), dec!(8.00), DayClass::Regular),
            Decimal::ZERO
        );
        assert_eq!(
            overtime_hours(dec!(6.50), dec!(8.00), DayClass::Regular),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_delay_zero_at_grace_boundary() {
        // 09:00 start, 15 min grace: 09:15 arrival is on time.
        assert_eq!(delay_hours(dt(2, 9, 15), t(9, 0), Some(15)), Decimal::ZERO);
    }

    #[test]
    fn test_delay_one_minute_past_grace() {
        assert_eq!(delay_hours(dt(2, 9, 16), t(9, 0), Some(15)), dec!(0.02));
    }

    #[test]
    fn test_delay_defaults_to_fifteen_minute_grace() {
        assert_eq!(delay_hours(dt(2, 9, 15), t(9, 0), None), Decimal::ZERO);
        assert_eq!(delay_hours(dt(2, 10, 15), t(9, 0), None), dec!(1.00));
    }

    #[test]
    fn test_late_minutes() {
        assert_eq!(late_minutes(dt(2, 9, 10), t(9, 0), Some(15)), 0);
        assert_eq!(late_minutes(dt(2, 9, 42), t(9, 0), Some(15)), 27);
    }

    #[test]
    fn test_early_out_before_scheduled_start_never_started() {
        assert_eq!(
            early_out_hours(d(2026, 3, 2), dt(2, 8, 30), t(9, 0), t(17, 0)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_early_out_ninety_minutes_before_end() {
        assert_eq!(
            early_out_hours(d(2026, 3, 2), dt(2, 15, 30), t(9, 0), t(17, 0)),
            dec!(1.50)
        );
    }

    #[test]
    fn test_early_out_at_or_after_end_is_zero() {
        assert_eq!(
            early_out_hours(d(2026, 3, 2), dt(2, 17, 0), t(9, 0), t(17, 0)),
            Decimal::ZERO
        );
        assert_eq!(
            early_out_hours(d(2026, 3, 2), dt(2, 18, 30), t(9, 0), t(17, 0)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_early_out_midnight_shift_next_day_exit() {
        // 22:00-06:00 shift, left at 04:00 the following day: 2h early.
        assert_eq!(
            early_out_hours(d(2026, 3, 2), dt(3, 4, 0), t(22, 0), t(6, 0)),
            dec!(2.00)
        );
    }

    #[test]
    fn test_shortage_suppressed_below_floor() {
        assert_eq!(shortage_hours(dec!(0.20), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_shortage_positive_difference() {
        assert_eq!(shortage_hours(dec!(8.00), dec!(6.50)), dec!(1.50));
        assert_eq!(shortage_hours(dec!(8.00), dec!(9.00)), Decimal::ZERO);
    }

    #[test]
    fn test_unit_conversion_round_trip() {
        for raw in [dec!(0.00), dec!(0.02), dec!(1.50), dec!(7.75), dec!(8.33)] {
            let back = minutes_to_hours(hours_to_minutes(raw));
            assert!(
                (back - raw).abs() <= dec!(0.01),
                "round trip drifted: {raw} -> {back}"
            );
        }
    }

    #[test]
    fn test_round_to_quarter_hour() {
        assert_eq!(round_to_quarter_hour(dec!(7)), Decimal::ZERO);
        assert_eq!(round_to_quarter_hour(dec!(8)), dec!(15));
        assert_eq!(round_to_quarter_hour(dec!(22)), dec!(15));
        assert_eq!(round_to_quarter_hour(dec!(23)), dec!(30));
        assert_eq!(round_to_quarter_hour(dec!(60)), dec!(60));
    }

    #[test]
    fn test_scheduled_duration_same_day() {
        assert_eq!(scheduled_duration_hours(t(9, 0), t(17, 30)), dec!(8.50));
    }

    #[test]
    fn test_scheduled_duration_crossing_midnight() {
        assert!(crosses_midnight(t(22, 0), t(6, 0)));
        assert_eq!(scheduled_duration_hours(t(22, 0), t(6, 0)), dec!(8.00));
    }
}
