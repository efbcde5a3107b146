use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::engine::attendance::{self, ManualEntryInput};
use crate::model::YesNo;
use crate::model::attendance::AttendanceRecord;

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "PRJ-DHK-01")]
    pub project_code: String,

    #[schema(example = 23.8103)]
    pub latitude: f64,

    #[schema(example = 90.4125)]
    pub longitude: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    /// Optional explicit transaction; today's open record is used otherwise.
    pub transaction_id: Option<String>,

    #[schema(example = 23.8103)]
    pub latitude: f64,

    #[schema(example = 90.4125)]
    pub longitude: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct ManualEntryRequest {
    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,

    pub project_code: Option<String>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub entry_time: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub exit_time: Option<NaiveDateTime>,

    #[schema(value_type = Option<f64>)]
    pub scheduled_hours: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub working_hours: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub overtime_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub delayed_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub early_out_calc: Option<Decimal>,

    #[schema(value_type = Option<f64>)]
    pub shortage_hours: Option<Decimal>,

    pub absence_flag: Option<YesNo>,
    pub absence_reason: Option<String>,
    pub notes: Option<String>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = crate::engine::attendance::CheckInOutput),
        (status = 400, description = "Already checked in, closed date, or outside the project radius", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 404, description = "Unknown employee or project"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let result = attendance::check_in(
        pool.get_ref(),
        &payload.employee_no,
        &payload.project_code,
        payload.latitude,
        payload.longitude,
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = crate::engine::attendance::CheckOutOutput),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 404, description = "Unknown employee or transaction"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckOutRequest>,
) -> actix_web::Result<impl Responder> {
    let result = attendance::check_out(
        pool.get_ref(),
        &payload.employee_no,
        payload.transaction_id.as_deref(),
        payload.latitude,
        payload.longitude,
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Manual entry/edit for HR, bypassing GPS validation
#[utoipa::path(
    put,
    path = "/api/v1/attendance/manual",
    request_body = ManualEntryRequest,
    responses(
        (status = 200, description = "Record saved", body = AttendanceRecord),
        (status = 400, description = "Attendance date is administratively closed"),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn manual_entry(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ManualEntryRequest>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let record = attendance::manual_entry(
        pool.get_ref(),
        ManualEntryInput {
            employee_no: payload.employee_no,
            attendance_date: payload.attendance_date,
            project_code: payload.project_code,
            entry_time: payload.entry_time,
            exit_time: payload.exit_time,
            scheduled_hours: payload.scheduled_hours,
            working_hours: payload.working_hours,
            overtime_calc: payload.overtime_calc,
            delayed_calc: payload.delayed_calc,
            early_out_calc: payload.early_out_calc,
            shortage_hours: payload.shortage_hours,
            absence_flag: payload.absence_flag,
            absence_reason: payload.absence_reason,
            notes: payload.notes,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(record))
}
