use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::YesNo;

/// One employee's attendance for one calendar date. A record with an entry
/// and no exit is "open"; closing it fills the computed metric columns.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "9f3c1d2e-0a1b-4c5d-8e7f-112233445566")]
    pub transaction_id: String,

    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,

    #[schema(example = "PRJ-DHK-01", nullable = true)]
    pub project_code: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub entry_time: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub exit_time: Option<NaiveDateTime>,

    pub entry_latitude: Option<f64>,
    pub entry_longitude: Option<f64>,
    pub exit_latitude: Option<f64>,
    pub exit_longitude: Option<f64>,
    pub entry_distance_meters: Option<f64>,
    pub exit_distance_meters: Option<f64>,

    #[schema(value_type = Option<f64>, example = 8.0)]
    pub scheduled_hours: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 9.0)]
    pub working_hours: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 1.0)]
    pub overtime_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 0.25)]
    pub delayed_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 0.0)]
    pub early_out_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>, example = 0.0)]
    pub shortage_hours: Option<Decimal>,

    pub absence_flag: YesNo,
    pub absence_reason: Option<String>,
    pub is_holiday_work: YesNo,
    pub is_weekend_work: YesNo,
    pub is_manual_entry: YesNo,
    pub notes: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<NaiveDateTime>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.entry_time.is_some() && self.exit_time.is_none()
    }
}
