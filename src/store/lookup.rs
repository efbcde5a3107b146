//! Read-only collaborator lookups: employee and project directories,
//! schedule resolution, holiday/weekend calendar, day closure.

use chrono::{Datelike, NaiveDate};
use sqlx::MySqlPool;

use crate::model::employee::Employee;
use crate::model::project::ProjectSite;
use crate::model::schedule::TimeSchedule;

pub async fn employee(pool: &MySqlPool, employee_no: &str) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT employee_no, monthly_salary, category, contract_type,
               hire_date, termination_date, department_id, project_code
        FROM employees
        WHERE employee_no = ?
        "#,
    )
    .bind(employee_no)
    .fetch_optional(pool)
    .await
}

pub async fn eligible_employees(
    pool: &MySqlPool,
    contract_types: &[String],
) -> Result<Vec<Employee>, sqlx::Error> {
    if contract_types.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; contract_types.len()].join(", ");
    let sql = format!(
        r#"
        SELECT employee_no, monthly_salary, category, contract_type,
               hire_date, termination_date, department_id, project_code
        FROM employees
        WHERE contract_type IN ({})
        ORDER BY employee_no
        "#,
        placeholders
    );

    let mut query = sqlx::query_as::<_, Employee>(&sql);
    for contract_type in contract_types {
        query = query.bind(contract_type);
    }
    query.fetch_all(pool).await
}

pub async fn project_site(
    pool: &MySqlPool,
    project_code: &str,
) -> Result<Option<ProjectSite>, sqlx::Error> {
    sqlx::query_as::<_, ProjectSite>(
        r#"
        SELECT project_code, latitude, longitude, radius_meters, require_location_check
        FROM projects
        WHERE project_code = ?
        "#,
    )
    .bind(project_code)
    .fetch_optional(pool)
    .await
}

/// Resolve the governing schedule for an employee. Project scope overrides
/// department scope; an unscoped active schedule is the fallback.
pub async fn resolve_schedule(
    pool: &MySqlPool,
    department_id: Option<u64>,
    project_code: Option<&str>,
) -> Result<Option<TimeSchedule>, sqlx::Error> {
    sqlx::query_as::<_, TimeSchedule>(
        r#"
        SELECT id, name, department_id, project_code, start_time, end_time,
               required_hours, grace_minutes, is_active
        FROM time_schedules
        WHERE is_active = 'Y'
          AND (project_code = ?
               OR department_id = ?
               OR (project_code IS NULL AND department_id IS NULL))
        ORDER BY CASE
            WHEN project_code = ? THEN 0
            WHEN department_id = ? THEN 1
            ELSE 2
        END
        LIMIT 1
        "#,
    )
    .bind(project_code)
    .bind(department_id)
    .bind(project_code)
    .bind(department_id)
    .fetch_optional(pool)
    .await
}

pub async fn is_holiday(pool: &MySqlPool, date: NaiveDate) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM holidays WHERE holiday_date = ?"#,
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn is_weekend(pool: &MySqlPool, date: NaiveDate) -> Result<bool, sqlx::Error> {
    // weekend_days stores 0=Sunday .. 6=Saturday
    let weekday = date.weekday().num_days_from_sunday();
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM weekend_days WHERE weekday = ?"#,
    )
    .bind(weekday)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Administratively closed dates block every attendance mutation.
pub async fn is_day_closed(pool: &MySqlPool, date: NaiveDate) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM closed_days WHERE closed_date = ?"#,
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}
