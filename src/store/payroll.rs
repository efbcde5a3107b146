use sqlx::{MySqlConnection, MySqlPool};

use crate::model::salary::{DetailLine, SalaryBreakdown, SalaryDetail, SalaryHeader};

const HEADER_COLUMNS: &str = r#"id, employee_no, salary_month, salary_version, salary_type,
    gross_salary, total_allowances, total_deductions, total_overtime, total_absence,
    total_loans, net_salary, trans_status, is_latest, recalculation_reason,
    next_approver_no, approval_level, created_at"#;

/// The authoritative (latest) header for an employee and month, if any.
pub async fn latest_header(
    pool: &MySqlPool,
    employee_no: &str,
    salary_month: &str,
) -> Result<Option<SalaryHeader>, sqlx::Error> {
    sqlx::query_as::<_, SalaryHeader>(&format!(
        "SELECT {HEADER_COLUMNS} FROM salary_headers \
         WHERE employee_no = ? AND salary_month = ? AND is_latest = 'Y'"
    ))
    .bind(employee_no)
    .bind(salary_month)
    .fetch_optional(pool)
    .await
}

/// Flip the current latest version to superseded. The unique key covers
/// (employee_no, salary_month, latest_key); superseded rows move their key
/// out of the 'Y' slot so a new latest row can land.
pub async fn supersede_latest(
    conn: &mut MySqlConnection,
    employee_no: &str,
    salary_month: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE salary_headers
        SET is_latest = 'N', latest_key = CONCAT('V', salary_version)
        WHERE employee_no = ? AND salary_month = ? AND is_latest = 'Y'
        "#,
    )
    .bind(employee_no)
    .bind(salary_month)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Insert a header as the latest version. The (employee_no, salary_month,
/// latest_key='Y') unique key is the duplicate-calculation guard under
/// concurrency; callers translate the collision.
pub async fn insert_header(
    conn: &mut MySqlConnection,
    header: &SalaryHeader,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO salary_headers
        (employee_no, salary_month, salary_version, salary_type, gross_salary,
         total_allowances, total_deductions, total_overtime, total_absence,
         total_loans, net_salary, trans_status, is_latest, latest_key,
         recalculation_reason, next_approver_no, approval_level, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'Y', 'Y', ?, ?, ?, NOW())
        "#,
    )
    .bind(&header.employee_no)
    .bind(&header.salary_month)
    .bind(header.salary_version)
    .bind(header.salary_type)
    .bind(header.gross_salary)
    .bind(header.total_allowances)
    .bind(header.total_deductions)
    .bind(header.total_overtime)
    .bind(header.total_absence)
    .bind(header.total_loans)
    .bind(header.net_salary)
    .bind(header.trans_status)
    .bind(&header.recalculation_reason)
    .bind(&header.next_approver_no)
    .bind(header.approval_level)
    .execute(conn)
    .await?;
    Ok(result.last_insert_id())
}

pub async fn insert_details(
    conn: &mut MySqlConnection,
    salary_id: u64,
    lines: &[DetailLine],
) -> Result<(), sqlx::Error> {
    for (index, line) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO salary_details
            (salary_id, line_no, trans_type_code, trans_amount, trans_category)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(salary_id)
        .bind((index + 1) as i32)
        .bind(&line.trans_type_code)
        .bind(line.trans_amount)
        .bind(line.trans_category)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn details_for(
    pool: &MySqlPool,
    salary_id: u64,
) -> Result<Vec<SalaryDetail>, sqlx::Error> {
    sqlx::query_as::<_, SalaryDetail>(
        r#"
        SELECT id, salary_id, line_no, trans_type_code, trans_amount, trans_category
        FROM salary_details
        WHERE salary_id = ?
        ORDER BY line_no
        "#,
    )
    .bind(salary_id)
    .fetch_all(pool)
    .await
}

pub async fn breakdowns_for(
    pool: &MySqlPool,
    employee_category: &str,
) -> Result<Vec<SalaryBreakdown>, sqlx::Error> {
    sqlx::query_as::<_, SalaryBreakdown>(
        r#"
        SELECT employee_category, trans_type_code, percentage
        FROM salary_breakdowns
        WHERE employee_category = ?
        ORDER BY trans_type_code
        "#,
    )
    .bind(employee_category)
    .fetch_all(pool)
    .await
}
