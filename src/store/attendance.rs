use chrono::NaiveDate;
use sqlx::{MySqlConnection, MySqlPool};

use crate::model::attendance::AttendanceRecord;
use crate::utils::sql::{SqlUpdate, UpdateBuilder, execute_update};

const COLUMNS: &str = r#"transaction_id, employee_no, attendance_date, project_code,
    entry_time, exit_time, entry_latitude, entry_longitude, exit_latitude, exit_longitude,
    entry_distance_meters, exit_distance_meters, scheduled_hours, working_hours,
    overtime_calc, delayed_calc, early_out_calc, shortage_hours, absence_flag,
    absence_reason, is_holiday_work, is_weekend_work, is_manual_entry, notes,
    created_at, updated_at"#;

pub async fn find_by_date(
    pool: &MySqlPool,
    employee_no: &str,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {COLUMNS} FROM attendance WHERE employee_no = ? AND attendance_date = ?"
    ))
    .bind(employee_no)
    .bind(date)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_transaction(
    pool: &MySqlPool,
    transaction_id: &str,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {COLUMNS} FROM attendance WHERE transaction_id = ?"
    ))
    .bind(transaction_id)
    .fetch_optional(pool)
    .await
}

/// Today's record with an entry and no exit, if any.
pub async fn find_open(
    pool: &MySqlPool,
    employee_no: &str,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {COLUMNS} FROM attendance \
         WHERE employee_no = ? AND attendance_date = ? \
         AND entry_time IS NOT NULL AND exit_time IS NULL"
    ))
    .bind(employee_no)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Insert a record. The unique key on (employee_no, attendance_date) is the
/// serialization point for concurrent check-ins; callers translate the
/// duplicate-key failure.
pub async fn insert(conn: &mut MySqlConnection, record: &AttendanceRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO attendance
        (transaction_id, employee_no, attendance_date, project_code,
         entry_time, exit_time, entry_latitude, entry_longitude,
         exit_latitude, exit_longitude, entry_distance_meters, exit_distance_meters,
         scheduled_hours, working_hours, overtime_calc, delayed_calc,
         early_out_calc, shortage_hours, absence_flag, absence_reason,
         is_holiday_work, is_weekend_work, is_manual_entry, notes,
         created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
        "#,
    )
    .bind(&record.transaction_id)
    .bind(&record.employee_no)
    .bind(record.attendance_date)
    .bind(&record.project_code)
    .bind(record.entry_time)
    .bind(record.exit_time)
    .bind(record.entry_latitude)
    .bind(record.entry_longitude)
    .bind(record.exit_latitude)
    .bind(record.exit_longitude)
    .bind(record.entry_distance_meters)
    .bind(record.exit_distance_meters)
    .bind(record.scheduled_hours)
    .bind(record.working_hours)
    .bind(record.overtime_calc)
    .bind(record.delayed_calc)
    .bind(record.early_out_calc)
    .bind(record.shortage_hours)
    .bind(record.absence_flag)
    .bind(&record.absence_reason)
    .bind(record.is_holiday_work)
    .bind(record.is_weekend_work)
    .bind(record.is_manual_entry)
    .bind(&record.notes)
    .execute(conn)
    .await?;
    Ok(())
}

/// Close an open record with the exit punch and computed metrics. Returns
/// affected rows; zero means another check-out won the race.
pub async fn close(
    conn: &mut MySqlConnection,
    record: &AttendanceRecord,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET exit_time = ?, exit_latitude = ?, exit_longitude = ?,
            exit_distance_meters = ?, working_hours = ?, overtime_calc = ?,
            early_out_calc = ?, shortage_hours = ?, updated_at = NOW()
        WHERE transaction_id = ? AND exit_time IS NULL
        "#,
    )
    .bind(record.exit_time)
    .bind(record.exit_latitude)
    .bind(record.exit_longitude)
    .bind(record.exit_distance_meters)
    .bind(record.working_hours)
    .bind(record.overtime_calc)
    .bind(record.early_out_calc)
    .bind(record.shortage_hours)
    .bind(&record.transaction_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Builder for partial HR edits; only the columns HR actually sent change.
pub fn update_builder() -> UpdateBuilder {
    UpdateBuilder::new("attendance")
}

pub async fn apply_update(
    conn: &mut MySqlConnection,
    update: SqlUpdate,
) -> Result<u64, sqlx::Error> {
    execute_update(conn, update).await
}
