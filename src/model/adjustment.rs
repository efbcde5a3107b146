use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::YesNo;

/// Allowance vs deduction, persisted as A/D.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
    strum::Display, strum::EnumString, ToSchema,
)]
pub enum EntryCategory {
    #[serde(rename = "A")]
    #[sqlx(rename = "A")]
    #[strum(serialize = "A")]
    Allowance,
    #[serde(rename = "D")]
    #[sqlx(rename = "D")]
    #[strum(serialize = "D")]
    Deduction,
}

/// Lifecycle of a monthly entry, persisted as P/A/S.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
    strum::Display, strum::EnumString, ToSchema,
)]
pub enum EntryStatus {
    #[serde(rename = "P")]
    #[sqlx(rename = "P")]
    #[strum(serialize = "P")]
    Pending,
    #[serde(rename = "A")]
    #[sqlx(rename = "A")]
    #[strum(serialize = "A")]
    Active,
    #[serde(rename = "S")]
    #[sqlx(rename = "S")]
    #[strum(serialize = "S")]
    Superseded,
}

/// Monthly allowance or deduction line. System-generated rows are owned by
/// the attendance synchronizer and carry the attendance date they derive
/// from; manual rows belong to HR and are never auto-rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyAdjustment {
    pub id: u64,
    pub employee_no: String,
    pub trans_type_code: String,
    pub trans_category: EntryCategory,

    #[schema(value_type = f64, example = 125.5)]
    pub amount: Decimal,

    #[schema(value_type = String, format = "date")]
    pub effective_date: NaiveDate,

    pub status: EntryStatus,
    pub is_system: YesNo,

    #[schema(value_type = Option<String>, format = "date")]
    pub source_date: Option<NaiveDate>,
}

/// Insert payload for a derived entry.
#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub employee_no: String,
    pub trans_type_code: String,
    pub trans_category: EntryCategory,
    pub amount: Decimal,
    pub effective_date: NaiveDate,
    pub status: EntryStatus,
    pub is_system: YesNo,
    pub source_date: Option<NaiveDate>,
}
