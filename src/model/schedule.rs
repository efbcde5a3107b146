use chrono::NaiveTime;
use rust_decimal::Decimal;

use super::YesNo;
use crate::calc::time;

/// Work schedule resolved per employee and date. End before start signals a
/// midnight-crossing shift.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimeSchedule {
    pub id: u64,
    pub name: String,
    pub department_id: Option<u64>,
    pub project_code: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_hours: Option<Decimal>,
    pub grace_minutes: Option<i32>,
    pub is_active: YesNo,
}

impl TimeSchedule {
    /// Required hours, falling back to the clock span when none recorded.
    pub fn scheduled_hours(&self) -> Decimal {
        self.required_hours
            .unwrap_or_else(|| time::scheduled_duration_hours(self.start_time, self.end_time))
    }

    pub fn grace(&self) -> Option<i64> {
        self.grace_minutes.map(i64::from)
    }
}
