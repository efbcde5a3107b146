use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Employee master data, read-only to this engine. Directory management
/// lives elsewhere; payroll only needs the pay-relevant slice.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
    pub employee_no: String,
    pub monthly_salary: Decimal,
    pub category: String,
    pub contract_type: String,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub department_id: Option<u64>,
    pub project_code: Option<String>,
}
