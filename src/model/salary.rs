use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::YesNo;
use super::adjustment::EntryCategory;

/// Approval state of a salary version, persisted as N/A/R.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
    strum::Display, strum::EnumString, ToSchema,
)]
pub enum ApprovalStatus {
    #[serde(rename = "N")]
    #[sqlx(rename = "N")]
    #[strum(serialize = "N")]
    Pending,
    #[serde(rename = "A")]
    #[sqlx(rename = "A")]
    #[strum(serialize = "A")]
    Approved,
    #[serde(rename = "R")]
    #[sqlx(rename = "R")]
    #[strum(serialize = "R")]
    Rejected,
}

/// Regular monthly run vs final settlement, persisted as R/F.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
    strum::Display, strum::EnumString, ToSchema,
)]
pub enum SalaryType {
    #[serde(rename = "R")]
    #[sqlx(rename = "R")]
    #[strum(serialize = "R")]
    Regular,
    #[serde(rename = "F")]
    #[sqlx(rename = "F")]
    #[strum(serialize = "F")]
    FinalSettlement,
}

/// One version of an employee's monthly payroll. Exactly one version per
/// (employee, month) is latest at any time; versions count up from 1.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryHeader {
    pub id: u64,

    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "2026-01")]
    pub salary_month: String,

    #[schema(example = 1)]
    pub salary_version: i32,

    pub salary_type: SalaryType,

    #[schema(value_type = f64, example = 3400.0)]
    pub gross_salary: Decimal,

    #[schema(value_type = f64)]
    pub total_allowances: Decimal,

    #[schema(value_type = f64)]
    pub total_deductions: Decimal,

    #[schema(value_type = f64)]
    pub total_overtime: Decimal,

    #[schema(value_type = f64)]
    pub total_absence: Decimal,

    #[schema(value_type = f64)]
    pub total_loans: Decimal,

    #[schema(value_type = f64, example = 3180.25)]
    pub net_salary: Decimal,

    pub trans_status: ApprovalStatus,
    pub is_latest: YesNo,
    pub recalculation_reason: Option<String>,
    pub next_approver_no: Option<String>,
    pub approval_level: Option<i32>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<NaiveDateTime>,
}

/// Header-owned line item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalaryDetail {
    pub id: u64,
    pub salary_id: u64,
    pub line_no: i32,

    #[schema(example = "BASIC")]
    pub trans_type_code: String,

    #[schema(value_type = f64)]
    pub trans_amount: Decimal,

    pub trans_category: EntryCategory,
}

/// A computed line before persistence assigns ids and sequence numbers.
#[derive(Debug, Clone)]
pub struct DetailLine {
    pub trans_type_code: String,
    pub trans_category: EntryCategory,
    pub trans_amount: Decimal,
}

impl DetailLine {
    pub fn new(code: &str, category: EntryCategory, amount: Decimal) -> Self {
        Self {
            trans_type_code: code.to_string(),
            trans_category: category,
            trans_amount: amount,
        }
    }
}

/// Fractional split of gross salary into named components for an employee
/// category. Rows for a category are expected to sum to 1.0; not enforced.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalaryBreakdown {
    pub employee_category: String,
    pub trans_type_code: String,
    pub percentage: Decimal,
}
