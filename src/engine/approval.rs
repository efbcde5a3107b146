//! Approval workflow collaborator. Payroll only needs the first step:
//! hand a new header to the workflow and record where it landed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::model::salary::ApprovalStatus;

#[derive(Debug, Clone)]
pub struct ApprovalInit {
    pub status: ApprovalStatus,
    pub next_approver_no: Option<String>,
    pub next_level: Option<i32>,
}

#[derive(sqlx::FromRow)]
struct LevelRow {
    approver_no: String,
    level: i32,
}

/// Enter a request into the approval workflow and return the initial state.
/// A request type with no configured levels is logged and left pending with
/// no approver; initialization never fails a payroll run.
pub async fn initialize(
    conn: &mut MySqlConnection,
    request_type: &str,
    employee_no: &str,
    amount: Decimal,
    date: NaiveDate,
) -> Result<ApprovalInit, sqlx::Error> {
    let first_level = sqlx::query_as::<_, LevelRow>(
        r#"
        SELECT approver_no, level
        FROM approval_levels
        WHERE request_type = ?
        ORDER BY level
        LIMIT 1
        "#,
    )
    .bind(request_type)
    .fetch_optional(conn)
    .await?;

    match first_level {
        Some(row) => {
            tracing::debug!(
                request_type,
                employee_no,
                amount = %amount,
                date = %date,
                approver = %row.approver_no,
                "Approval workflow initialized"
            );
            Ok(ApprovalInit {
                status: ApprovalStatus::Pending,
                next_approver_no: Some(row.approver_no),
                next_level: Some(row.level),
            })
        }
        None => {
            tracing::warn!(
                request_type,
                employee_no,
                "No approval levels configured; request stays pending without an approver"
            );
            Ok(ApprovalInit {
                status: ApprovalStatus::Pending,
                next_approver_no: None,
                next_level: None,
            })
        }
    }
}
