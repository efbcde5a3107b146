//! Check-in / check-out orchestration. A record moves none -> open (entry,
//! no exit) -> closed (entry and exit); each transition runs the geo and
//! time calculators and leaves the monthly entries consistent.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::calc::geo::{self, Coordinate};
use crate::calc::time::{self, DayClass};
use crate::engine::sync;
use crate::error::EngineError;
use crate::model::YesNo;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::project::ProjectSite;
use crate::model::schedule::TimeSchedule;
use crate::store::{self, lookup};
use crate::utils::site_cache;
use crate::utils::sql::SqlValue;

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInOutput {
    #[schema(example = "9f3c1d2e-0a1b-4c5d-8e7f-112233445566")]
    pub transaction_id: String,
    pub distance_meters: Option<f64>,
    #[schema(example = 0)]
    pub minutes_late: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutOutput {
    #[schema(value_type = f64, example = 9.0)]
    pub working_hours: Decimal,
    #[schema(value_type = f64, example = 1.0)]
    pub overtime_calc: Decimal,
    #[schema(value_type = f64, example = 0.0)]
    pub delayed_calc: Decimal,
    #[schema(value_type = f64, example = 0.0)]
    pub early_out_calc: Decimal,
    #[schema(value_type = f64, example = 0.0)]
    pub shortage_hours: Decimal,
}

/// HR manual entry/edit. Unset metric fields are auto-computed where the
/// entry/exit timestamps allow it; GPS validation is bypassed.
#[derive(Debug, Clone)]
pub struct ManualEntryInput {
    pub employee_no: String,
    pub attendance_date: NaiveDate,
    pub project_code: Option<String>,
    pub entry_time: Option<NaiveDateTime>,
    pub exit_time: Option<NaiveDateTime>,
    pub scheduled_hours: Option<Decimal>,
    pub working_hours: Option<Decimal>,
    pub overtime_calc: Option<Decimal>,
    pub delayed_calc: Option<Decimal>,
    pub early_out_calc: Option<Decimal>,
    pub shortage_hours: Option<Decimal>,
    pub absence_flag: Option<YesNo>,
    pub absence_reason: Option<String>,
    pub notes: Option<String>,
}

async fn require_employee(pool: &MySqlPool, employee_no: &str) -> Result<Employee, EngineError> {
    lookup::employee(pool, employee_no)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("Employee {employee_no}")))
}

async fn reject_closed_day(pool: &MySqlPool, date: NaiveDate) -> Result<(), EngineError> {
    if lookup::is_day_closed(pool, date).await? {
        return Err(EngineError::business(format!(
            "Attendance date {date} is administratively closed"
        )));
    }
    Ok(())
}

/// Distance to the site, plus the radius rejection when the project demands
/// a location check.
fn validate_location(
    punch: Coordinate,
    site: &ProjectSite,
    action: &str,
) -> Result<f64, EngineError> {
    let site_coord = Coordinate::new(site.latitude, site.longitude)?;
    let distance = geo::distance_meters(punch, site_coord);

    if site.require_location_check.as_bool()
        && !geo::within_radius(punch, site_coord, site.radius_meters)?
    {
        return Err(EngineError::business(format!(
            "{action} location is {distance:.0}m from project {}, outside the allowed {:.0}m radius",
            site.project_code, site.radius_meters
        )));
    }
    Ok(distance)
}

async fn day_class(pool: &MySqlPool, date: NaiveDate) -> Result<DayClass, EngineError> {
    if lookup::is_holiday(pool, date).await? {
        return Ok(DayClass::Holiday);
    }
    if lookup::is_weekend(pool, date).await? {
        return Ok(DayClass::Weekend);
    }
    Ok(DayClass::Regular)
}

async fn require_schedule(
    pool: &MySqlPool,
    employee: &Employee,
    project_code: Option<&str>,
) -> Result<TimeSchedule, EngineError> {
    lookup::resolve_schedule(pool, employee.department_id, project_code)
        .await?
        .ok_or_else(|| {
            EngineError::not_found(format!(
                "Applicable schedule for employee {}",
                employee.employee_no
            ))
        })
}

pub async fn check_in(
    pool: &MySqlPool,
    employee_no: &str,
    project_code: &str,
    latitude: f64,
    longitude: f64,
) -> Result<CheckInOutput, EngineError> {
    let employee = require_employee(pool, employee_no).await?;
    let now = Local::now().naive_local();
    let today = now.date();

    reject_closed_day(pool, today).await?;

    if store::attendance::find_by_date(pool, employee_no, today)
        .await?
        .is_some()
    {
        return Err(EngineError::business("Already checked in today"));
    }

    let punch = Coordinate::new(latitude, longitude)?;
    let site = site_cache::get_site(pool, project_code)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("Project {project_code}")))?;
    let distance = validate_location(punch, &site, "Check-in")?;

    let schedule = require_schedule(pool, &employee, Some(project_code)).await?;
    let delayed = time::delay_hours(now, schedule.start_time, schedule.grace());
    let minutes_late = time::late_minutes(now, schedule.start_time, schedule.grace());
    let day = day_class(pool, today).await?;

    let record = AttendanceRecord {
        transaction_id: Uuid::new_v4().to_string(),
        employee_no: employee_no.to_string(),
        attendance_date: today,
        project_code: Some(project_code.to_string()),
        entry_time: Some(now),
        exit_time: None,
        entry_latitude: Some(punch.latitude()),
        entry_longitude: Some(punch.longitude()),
        exit_latitude: None,
        exit_longitude: None,
        entry_distance_meters: Some(distance),
        exit_distance_meters: None,
        scheduled_hours: Some(schedule.scheduled_hours()),
        working_hours: None,
        overtime_calc: None,
        delayed_calc: Some(delayed),
        early_out_calc: None,
        shortage_hours: None,
        absence_flag: YesNo::No,
        absence_reason: None,
        is_holiday_work: YesNo::from_bool(day == DayClass::Holiday),
        is_weekend_work: YesNo::from_bool(day == DayClass::Weekend),
        is_manual_entry: YesNo::No,
        notes: None,
        created_at: None,
        updated_at: None,
    };

    let mut conn = pool.acquire().await?;
    match store::attendance::insert(&mut *conn, &record).await {
        Ok(()) => {}
        // Concurrent punch lost the race on the (employee, date) key.
        Err(e) if store::is_duplicate_key(&e) => {
            return Err(EngineError::business("Already checked in today"));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        employee_no,
        transaction_id = %record.transaction_id,
        minutes_late,
        "Check-in recorded"
    );

    Ok(CheckInOutput {
        transaction_id: record.transaction_id,
        distance_meters: Some(distance),
        minutes_late,
    })
}

pub async fn check_out(
    pool: &MySqlPool,
    employee_no: &str,
    transaction_id: Option<&str>,
    latitude: f64,
    longitude: f64,
) -> Result<CheckOutOutput, EngineError> {
    let employee = require_employee(pool, employee_no).await?;
    let now = Local::now().naive_local();

    let record = match transaction_id {
        Some(id) => store::attendance::find_by_transaction(pool, id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Attendance transaction {id}")))?,
        None => store::attendance::find_open(pool, employee_no, now.date())
            .await?
            .ok_or_else(|| EngineError::business("No active check-in found for today"))?,
    };

    if record.employee_no != employee_no {
        return Err(EngineError::business(
            "Attendance transaction belongs to a different employee",
        ));
    }
    if !record.is_open() {
        return Err(EngineError::business("Attendance record is already closed"));
    }
    reject_closed_day(pool, record.attendance_date).await?;

    let punch = Coordinate::new(latitude, longitude)?;
    let mut exit_distance = None;
    if let Some(code) = record.project_code.as_deref() {
        if let Some(site) = site_cache::get_site(pool, code).await? {
            exit_distance = Some(validate_location(punch, &site, "Check-out")?);
        }
    }

    let schedule = require_schedule(pool, &employee, record.project_code.as_deref()).await?;
    let scheduled = record
        .scheduled_hours
        .unwrap_or_else(|| schedule.scheduled_hours());
    let day = if record.is_holiday_work.as_bool() {
        DayClass::Holiday
    } else if record.is_weekend_work.as_bool() {
        DayClass::Weekend
    } else {
        DayClass::Regular
    };

    let working = time::working_hours(record.entry_time, Some(now)).unwrap_or(Decimal::ZERO);
    let overtime = time::overtime_hours(working, scheduled, day);
    let early_out = time::early_out_hours(
        record.attendance_date,
        now,
        schedule.start_time,
        schedule.end_time,
    );
    let shortage = time::shortage_hours(scheduled, working);

    let closed = AttendanceRecord {
        exit_time: Some(now),
        exit_latitude: Some(punch.latitude()),
        exit_longitude: Some(punch.longitude()),
        exit_distance_meters: exit_distance,
        working_hours: Some(working),
        overtime_calc: Some(overtime),
        early_out_calc: Some(early_out),
        shortage_hours: Some(shortage),
        ..record
    };

    let mut tx = pool.begin().await?;
    let affected = store::attendance::close(&mut *tx, &closed).await?;
    if affected == 0 {
        return Err(EngineError::business("No active check-in found for today"));
    }
    sync::sync_record(&mut *tx, &employee, &closed).await?;
    tx.commit().await?;

    tracing::info!(
        employee_no,
        transaction_id = %closed.transaction_id,
        working_hours = %working,
        overtime = %overtime,
        "Check-out recorded"
    );

    Ok(CheckOutOutput {
        working_hours: working,
        overtime_calc: overtime,
        delayed_calc: closed.delayed_calc.unwrap_or(Decimal::ZERO),
        early_out_calc: early_out,
        shortage_hours: shortage,
    })
}

/// Create or overwrite a record outside the punch flow. GPS validation is
/// bypassed; metric fields the caller left unset are computed when the
/// timestamps allow it. The monthly entries are re-synchronized afterwards.
pub async fn manual_entry(
    pool: &MySqlPool,
    input: ManualEntryInput,
) -> Result<AttendanceRecord, EngineError> {
    let employee = require_employee(pool, &input.employee_no).await?;
    reject_closed_day(pool, input.attendance_date).await?;

    let existing =
        store::attendance::find_by_date(pool, &input.employee_no, input.attendance_date).await?;

    let project_code = input
        .project_code
        .clone()
        .or_else(|| existing.as_ref().and_then(|r| r.project_code.clone()));
    let schedule =
        lookup::resolve_schedule(pool, employee.department_id, project_code.as_deref()).await?;

    let entry_time = input
        .entry_time
        .or_else(|| existing.as_ref().and_then(|r| r.entry_time));
    let exit_time = input
        .exit_time
        .or_else(|| existing.as_ref().and_then(|r| r.exit_time));
    let scheduled_hours = input
        .scheduled_hours
        .or_else(|| existing.as_ref().and_then(|r| r.scheduled_hours))
        .or_else(|| schedule.as_ref().map(|s| s.scheduled_hours()));

    let day = day_class(pool, input.attendance_date).await?;
    let working = input
        .working_hours
        .or_else(|| time::working_hours(entry_time, exit_time));
    let overtime = input.overtime_calc.or_else(|| {
        working.zip(scheduled_hours).map(|(w, s)| time::overtime_hours(w, s, day))
    });
    let delayed = input.delayed_calc.or_else(|| {
        entry_time
            .zip(schedule.as_ref())
            .map(|(entry, s)| time::delay_hours(entry, s.start_time, s.grace()))
    });
    let early_out = input.early_out_calc.or_else(|| {
        exit_time.zip(schedule.as_ref()).map(|(exit, s)| {
            time::early_out_hours(input.attendance_date, exit, s.start_time, s.end_time)
        })
    });
    let shortage = input.shortage_hours.or_else(|| {
        working
            .zip(scheduled_hours)
            .map(|(w, s)| time::shortage_hours(s, w))
    });
    let absence_flag = input
        .absence_flag
        .or_else(|| existing.as_ref().map(|r| r.absence_flag))
        .unwrap_or(YesNo::No);

    let record = AttendanceRecord {
        transaction_id: existing
            .as_ref()
            .map(|r| r.transaction_id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        employee_no: input.employee_no.clone(),
        attendance_date: input.attendance_date,
        project_code,
        entry_time,
        exit_time,
        entry_latitude: existing.as_ref().and_then(|r| r.entry_latitude),
        entry_longitude: existing.as_ref().and_then(|r| r.entry_longitude),
        exit_latitude: existing.as_ref().and_then(|r| r.exit_latitude),
        exit_longitude: existing.as_ref().and_then(|r| r.exit_longitude),
        entry_distance_meters: existing.as_ref().and_then(|r| r.entry_distance_meters),
        exit_distance_meters: existing.as_ref().and_then(|r| r.exit_distance_meters),
        scheduled_hours,
        working_hours: working,
        overtime_calc: overtime,
        delayed_calc: delayed,
        early_out_calc: early_out,
        shortage_hours: shortage,
        absence_flag,
        absence_reason: input
            .absence_reason
            .clone()
            .or_else(|| existing.as_ref().and_then(|r| r.absence_reason.clone())),
        is_holiday_work: YesNo::from_bool(day == DayClass::Holiday),
        is_weekend_work: YesNo::from_bool(day == DayClass::Weekend),
        is_manual_entry: YesNo::Yes,
        notes: input
            .notes
            .clone()
            .or_else(|| existing.as_ref().and_then(|r| r.notes.clone())),
        created_at: None,
        updated_at: None,
    };

    let mut tx = pool.begin().await?;
    if existing.is_some() {
        let update = store::attendance::update_builder()
            .set("project_code", opt_str(record.project_code.clone()))
            .set("entry_time", opt_datetime(record.entry_time))
            .set("exit_time", opt_datetime(record.exit_time))
            .set("scheduled_hours", opt_dec(record.scheduled_hours))
            .set("working_hours", opt_dec(record.working_hours))
            .set("overtime_calc", opt_dec(record.overtime_calc))
            .set("delayed_calc", opt_dec(record.delayed_calc))
            .set("early_out_calc", opt_dec(record.early_out_calc))
            .set("shortage_hours", opt_dec(record.shortage_hours))
            .set("absence_flag", SqlValue::Str(record.absence_flag.to_string()))
            .set("absence_reason", opt_str(record.absence_reason.clone()))
            .set("is_holiday_work", SqlValue::Str(record.is_holiday_work.to_string()))
            .set("is_weekend_work", SqlValue::Str(record.is_weekend_work.to_string()))
            .set("is_manual_entry", SqlValue::Str(YesNo::Yes.to_string()))
            .set("notes", opt_str(record.notes.clone()))
            .build("transaction_id", SqlValue::Str(record.transaction_id.clone()));
        store::attendance::apply_update(&mut *tx, update).await?;
    } else {
        store::attendance::insert(&mut *tx, &record).await?;
    }
    sync::sync_record(&mut *tx, &employee, &record).await?;
    tx.commit().await?;

    tracing::info!(
        employee_no = %record.employee_no,
        date = %record.attendance_date,
        "Manual attendance entry saved"
    );

    Ok(record)
}

fn opt_str(value: Option<String>) -> SqlValue {
    value.map(SqlValue::Str).unwrap_or(SqlValue::Null)
}

fn opt_dec(value: Option<Decimal>) -> SqlValue {
    value.map(SqlValue::Dec).unwrap_or(SqlValue::Null)
}

fn opt_datetime(value: Option<NaiveDateTime>) -> SqlValue {
    value.map(SqlValue::DateTime).unwrap_or(SqlValue::Null)
}
