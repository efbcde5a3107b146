use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Installment payment state, persisted as U/P. An installment flips to
/// Paid exactly once, inside the payroll transaction that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, strum::Display, strum::EnumString)]
pub enum InstallmentStatus {
    #[sqlx(rename = "U")]
    #[strum(serialize = "U")]
    Unpaid,
    #[sqlx(rename = "P")]
    #[strum(serialize = "P")]
    Paid,
}

/// Unpaid installment due inside the payroll month, joined to its loan.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueInstallment {
    pub installment_id: u64,
    pub loan_id: u64,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}
