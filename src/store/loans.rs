use chrono::NaiveDate;
use sqlx::MySqlConnection;

use crate::model::loan::{DueInstallment, InstallmentStatus};

/// Unpaid installments falling due inside the payroll month.
pub async fn due_installments(
    conn: &mut MySqlConnection,
    employee_no: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DueInstallment>, sqlx::Error> {
    sqlx::query_as::<_, DueInstallment>(
        r#"
        SELECT li.id AS installment_id, li.loan_id, li.due_date, li.amount
        FROM loan_installments li
        JOIN loans l ON l.id = li.loan_id
        WHERE l.employee_no = ? AND li.status = ?
          AND li.due_date BETWEEN ? AND ?
        ORDER BY li.due_date, li.id
        "#,
    )
    .bind(employee_no)
    .bind(InstallmentStatus::Unpaid)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
}

/// Mark one installment paid and decrement the loan balance. The status
/// guard makes consumption single-shot: zero affected rows means another
/// payroll run already took it, and the caller must roll back.
pub async fn consume_installment(
    conn: &mut MySqlConnection,
    installment: &DueInstallment,
    salary_id: u64,
) -> Result<bool, sqlx::Error> {
    let marked = sqlx::query(
        r#"
        UPDATE loan_installments
        SET status = ?, paid_in_salary_id = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(InstallmentStatus::Paid)
    .bind(salary_id)
    .bind(installment.installment_id)
    .bind(InstallmentStatus::Unpaid)
    .execute(&mut *conn)
    .await?;

    if marked.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE loans
        SET remaining_balance = remaining_balance - ?
        WHERE id = ?
        "#,
    )
    .bind(installment.amount)
    .bind(installment.loan_id)
    .execute(conn)
    .await?;

    Ok(true)
}
