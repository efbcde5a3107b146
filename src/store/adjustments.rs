use chrono::NaiveDate;
use sqlx::{MySqlConnection, MySqlPool};

use crate::model::adjustment::{MonthlyAdjustment, NewAdjustment};

const COLUMNS: &str = r#"id, employee_no, trans_type_code, trans_category, amount,
    effective_date, status, is_system, source_date"#;

/// Replace the system-generated entries derived from one attendance date.
/// Manual entries are never touched by this path.
pub async fn replace_system_for_date(
    conn: &mut MySqlConnection,
    employee_no: &str,
    source_date: NaiveDate,
    entries: &[NewAdjustment],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM monthly_adjustments
        WHERE employee_no = ? AND source_date = ? AND is_system = 'Y'
        "#,
    )
    .bind(employee_no)
    .bind(source_date)
    .execute(&mut *conn)
    .await?;

    for entry in entries {
        insert(&mut *conn, entry).await?;
    }
    Ok(())
}

pub async fn insert(
    conn: &mut MySqlConnection,
    entry: &NewAdjustment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO monthly_adjustments
        (employee_no, trans_type_code, trans_category, amount,
         effective_date, status, is_system, source_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.employee_no)
    .bind(&entry.trans_type_code)
    .bind(entry.trans_category)
    .bind(entry.amount)
    .bind(entry.effective_date)
    .bind(entry.status)
    .bind(entry.is_system)
    .bind(entry.source_date)
    .execute(conn)
    .await?;
    Ok(())
}

/// Active entries effective on or before the end of the payroll month.
pub async fn active_through(
    pool: &MySqlPool,
    employee_no: &str,
    through: NaiveDate,
) -> Result<Vec<MonthlyAdjustment>, sqlx::Error> {
    sqlx::query_as::<_, MonthlyAdjustment>(&format!(
        "SELECT {COLUMNS} FROM monthly_adjustments \
         WHERE employee_no = ? AND status = 'A' AND effective_date <= ? \
         ORDER BY trans_category, trans_type_code, effective_date"
    ))
    .bind(employee_no)
    .bind(through)
    .fetch_all(pool)
    .await
}
