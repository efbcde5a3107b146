//! Per-employee monthly payroll aggregation: eligibility, proration,
//! breakdown expansion, allowance/deduction/loan aggregation, version
//! management and approval initiation.

use futures::StreamExt;
use rust_decimal::prelude::*;
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::calc::month::SalaryMonth;
use crate::config::Config;
use crate::consts::{APPROVAL_REQUEST_PAYROLL, MONEY_DP, PRORATION_DAYS, TT_ABSENCE, TT_BASIC, TT_LOAN, TT_OVERTIME};
use crate::engine::approval;
use crate::error::EngineError;
use crate::model::YesNo;
use crate::model::adjustment::EntryCategory;
use crate::model::employee::Employee;
use crate::model::salary::{DetailLine, SalaryBreakdown, SalaryHeader, SalaryType};
use crate::store::{self, lookup};

/// How many employees a batch run works on concurrently. The serialization
/// guards are all per-employee, so parallelism across employees is safe.
const BATCH_CONCURRENCY: usize = 8;

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Flat 30-day proration of the monthly salary, 4 decimals.
pub fn prorated_gross(monthly_salary: Decimal, active_days: i64) -> Decimal {
    money(monthly_salary * Decimal::from(active_days) / PRORATION_DAYS)
}

/// Expand gross into configured component lines. No configured rows is not
/// an error: the whole gross lands on a single line.
pub fn expand_breakdown(gross: Decimal, breakdowns: &[SalaryBreakdown]) -> Vec<DetailLine> {
    if breakdowns.is_empty() {
        return vec![DetailLine::new(TT_BASIC, EntryCategory::Allowance, gross)];
    }
    breakdowns
        .iter()
        .map(|b| {
            DetailLine::new(
                &b.trans_type_code,
                EntryCategory::Allowance,
                money(gross * b.percentage),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

/// Sum the detail lines by category; net is allowances minus deductions and
/// may legitimately be negative.
pub fn totals(lines: &[DetailLine]) -> Totals {
    let mut allowances = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;
    for line in lines {
        match line.trans_category {
            EntryCategory::Allowance => allowances += line.trans_amount,
            EntryCategory::Deduction => deductions += line.trans_amount,
        }
    }
    Totals {
        allowances,
        deductions,
        net: allowances - deductions,
    }
}

/// Version decision: a fresh calculation refuses months that already have an
/// authoritative version, a recalculation refuses months that have none.
fn resolve_version(
    employee_no: &str,
    month: &str,
    prior_version: Option<i32>,
    recalculating: bool,
) -> Result<i32, EngineError> {
    match (prior_version, recalculating) {
        (Some(_), false) => Err(EngineError::business(format!(
            "Payroll for {employee_no} {month} is already calculated; use the recalculation path"
        ))),
        (None, true) => Err(EngineError::business(format!(
            "No payroll exists for {employee_no} {month} to recalculate"
        ))),
        (Some(version), true) => Ok(version + 1),
        (None, false) => Ok(1),
    }
}

async fn run(
    pool: &MySqlPool,
    config: &Config,
    employee: &Employee,
    month: SalaryMonth,
    recalc_reason: Option<String>,
) -> Result<SalaryHeader, EngineError> {
    let employee_no = employee.employee_no.as_str();
    let month_str = month.to_string();

    if !config
        .eligible_contract_types
        .iter()
        .any(|t| t == &employee.contract_type)
    {
        return Err(EngineError::business(format!(
            "Employee {employee_no} has contract type '{}' which is not payroll-eligible; requires one of: {}",
            employee.contract_type,
            config.eligible_contract_types.join(", ")
        )));
    }

    let prior = store::payroll::latest_header(pool, employee_no, &month_str).await?;
    let version = resolve_version(
        employee_no,
        &month_str,
        prior.as_ref().map(|p| p.salary_version),
        recalc_reason.is_some(),
    )?;

    let active_days = month.active_days(employee.hire_date, employee.termination_date);
    let gross = prorated_gross(employee.monthly_salary, active_days);

    let breakdowns = store::payroll::breakdowns_for(pool, &employee.category).await?;
    if breakdowns.is_empty() {
        tracing::info!(
            employee_no,
            category = %employee.category,
            "No salary breakdown configured; emitting a single gross line"
        );
    }
    let mut lines = expand_breakdown(gross, &breakdowns);

    let mut total_overtime = Decimal::ZERO;
    let mut total_absence = Decimal::ZERO;
    for adj in store::adjustments::active_through(pool, employee_no, month.last_day()).await? {
        if adj.trans_type_code == TT_OVERTIME && adj.trans_category == EntryCategory::Allowance {
            total_overtime += adj.amount;
        }
        if adj.trans_type_code == TT_ABSENCE {
            total_absence += adj.amount;
        }
        lines.push(DetailLine::new(
            &adj.trans_type_code,
            adj.trans_category,
            adj.amount,
        ));
    }

    let salary_type = if employee
        .termination_date
        .map(|t| month.contains(t) || t < month.first_day())
        .unwrap_or(false)
    {
        SalaryType::FinalSettlement
    } else {
        SalaryType::Regular
    };

    let mut tx = pool.begin().await?;

    let installments = store::loans::due_installments(
        &mut *tx,
        employee_no,
        month.first_day(),
        month.last_day(),
    )
    .await?;
    let mut total_loans = Decimal::ZERO;
    for installment in &installments {
        total_loans += installment.amount;
        lines.push(DetailLine::new(
            TT_LOAN,
            EntryCategory::Deduction,
            installment.amount,
        ));
    }

    let sums = totals(&lines);
    if sums.net < Decimal::ZERO {
        tracing::warn!(
            employee_no,
            month = %month_str,
            net_salary = %sums.net,
            "Net salary is negative; recorded for downstream handling"
        );
    }

    if recalc_reason.is_some() {
        let superseded = store::payroll::supersede_latest(&mut *tx, employee_no, &month_str).await?;
        if superseded == 0 {
            // The prior version vanished between the read and the write.
            return Err(EngineError::business(format!(
                "No payroll exists for {employee_no} {month_str} to recalculate"
            )));
        }
    }

    let approval_state = approval::initialize(
        &mut *tx,
        APPROVAL_REQUEST_PAYROLL,
        employee_no,
        sums.net,
        month.last_day(),
    )
    .await?;

    let mut header = SalaryHeader {
        id: 0,
        employee_no: employee_no.to_string(),
        salary_month: month_str.clone(),
        salary_version: version,
        salary_type,
        gross_salary: gross,
        total_allowances: sums.allowances,
        total_deductions: sums.deductions,
        total_overtime,
        total_absence,
        total_loans,
        net_salary: sums.net,
        trans_status: approval_state.status,
        is_latest: YesNo::Yes,
        recalculation_reason: recalc_reason,
        next_approver_no: approval_state.next_approver_no,
        approval_level: approval_state.next_level,
        created_at: None,
    };

    let salary_id = match store::payroll::insert_header(&mut *tx, &header).await {
        Ok(id) => id,
        // A concurrent calculation landed its latest row first.
        Err(e) if store::is_duplicate_key(&e) => {
            return Err(EngineError::business(format!(
                "Payroll for {employee_no} {month_str} is already calculated; use the recalculation path"
            )));
        }
        Err(e) => return Err(e.into()),
    };
    header.id = salary_id;

    store::payroll::insert_details(&mut *tx, salary_id, &lines).await?;

    for installment in &installments {
        if !store::loans::consume_installment(&mut *tx, installment, salary_id).await? {
            // Dropping the transaction rolls everything back, including the
            // header that would have double-counted this installment.
            return Err(EngineError::business(format!(
                "Loan installment {} was already consumed by a concurrent payroll run",
                installment.installment_id
            )));
        }
        tracing::debug!(
            employee_no,
            installment_id = installment.installment_id,
            due_date = %installment.due_date,
            amount = %installment.amount,
            "Loan installment consumed"
        );
    }

    tx.commit().await?;

    tracing::info!(
        employee_no,
        month = %month_str,
        version,
        net_salary = %header.net_salary,
        "Payroll version stored"
    );

    Ok(header)
}

/// Calculate the first payroll version for an employee and month.
pub async fn calculate(
    pool: &MySqlPool,
    config: &Config,
    employee_no: &str,
    month_raw: &str,
) -> Result<SalaryHeader, EngineError> {
    let month = SalaryMonth::parse(month_raw)?;
    let employee = lookup::employee(pool, employee_no)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("Employee {employee_no}")))?;
    run(pool, config, &employee, month, None).await
}

/// Supersede the current version and store version N+1 with the reason.
pub async fn recalculate(
    pool: &MySqlPool,
    config: &Config,
    employee_no: &str,
    month_raw: &str,
    reason: &str,
) -> Result<SalaryHeader, EngineError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::validation(
            "A recalculation reason is required",
        ));
    }
    let month = SalaryMonth::parse(month_raw)?;
    let employee = lookup::employee(pool, employee_no)
        .await?
        .ok_or_else(|| EngineError::not_found(format!("Employee {employee_no}")))?;
    run(pool, config, &employee, month, Some(reason.to_string())).await
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchFailure {
    pub employee_no: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

/// Run every eligible employee independently; one failure never aborts the
/// rest of the batch.
pub async fn calculate_for_all(
    pool: &MySqlPool,
    config: &Config,
    month_raw: &str,
) -> Result<BatchOutcome, EngineError> {
    let month = SalaryMonth::parse(month_raw)?;
    let employees = lookup::eligible_employees(pool, &config.eligible_contract_types).await?;

    let results: Vec<(String, Option<String>)> = futures::stream::iter(
        employees.into_iter().map(|employee| async move {
            let employee_no = employee.employee_no.clone();
            match run(pool, config, &employee, month, None).await {
                Ok(_) => (employee_no, None),
                Err(e) => (employee_no, Some(e.to_string())),
            }
        }),
    )
    .buffer_unordered(BATCH_CONCURRENCY)
    .collect()
    .await;

    let mut outcome = BatchOutcome {
        succeeded: Vec::new(),
        failed: Vec::new(),
    };
    for (employee_no, failure) in results {
        match failure {
            None => outcome.succeeded.push(employee_no),
            Some(reason) => {
                tracing::warn!(employee_no = %employee_no, reason = %reason, "Batch payroll entry failed");
                outcome.failed.push(BatchFailure {
                    employee_no,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        month = month_raw,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Batch payroll run finished"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn breakdown(code: &str, pct: Decimal) -> SalaryBreakdown {
        SalaryBreakdown {
            employee_category: "STAFF".to_string(),
            trans_type_code: code.to_string(),
            percentage: pct,
        }
    }

    #[test]
    fn test_proration_mid_month_hire() {
        // 6000 over 17 of 30 days
        assert_eq!(prorated_gross(dec!(6000), 17), dec!(3400.0000));
    }

    #[test]
    fn test_proration_mid_month_termination() {
        assert_eq!(prorated_gross(dec!(6000), 15), dec!(3000.0000));
    }

    #[test]
    fn test_proration_thirty_one_active_days_exceeds_salary() {
        // A full 31-day month pays slightly over the nominal salary by the
        // flat divisor rule.
        assert_eq!(prorated_gross(dec!(3000), 31), dec!(3100.0000));
    }

    #[test]
    fn test_proration_zero_days() {
        assert_eq!(prorated_gross(dec!(6000), 0), dec!(0.0000));
    }

    #[test]
    fn test_expand_breakdown_splits_gross() {
        let rows = vec![
            breakdown("BASIC", dec!(0.6)),
            breakdown("HOUSING", dec!(0.25)),
            breakdown("TRANSPORT", dec!(0.15)),
        ];
        let lines = expand_breakdown(dec!(3000.0000), &rows);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trans_amount, dec!(1800.0000));
        assert_eq!(lines[1].trans_amount, dec!(750.0000));
        assert_eq!(lines[2].trans_amount, dec!(450.0000));
        assert!(lines.iter().all(|l| l.trans_category == EntryCategory::Allowance));
    }

    #[test]
    fn test_expand_breakdown_falls_back_to_single_line() {
        let lines = expand_breakdown(dec!(3400.0000), &[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].trans_type_code, TT_BASIC);
        assert_eq!(lines[0].trans_amount, dec!(3400.0000));
    }

    #[test]
    fn test_totals_identity_within_tolerance() {
        let lines = vec![
            DetailLine::new("BASIC", EntryCategory::Allowance, dec!(2040.0000)),
            DetailLine::new("HOUSING", EntryCategory::Allowance, dec!(850.0000)),
            DetailLine::new("LATE_DED", EntryCategory::Deduction, dec!(12.5000)),
            DetailLine::new(TT_LOAN, EntryCategory::Deduction, dec!(500.0000)),
        ];
        let sums = totals(&lines);
        assert_eq!(sums.allowances, dec!(2890.0000));
        assert_eq!(sums.deductions, dec!(512.5000));
        let identity = sums.allowances - sums.deductions - sums.net;
        assert!(identity.abs() <= crate::consts::MONEY_TOLERANCE);
    }

    #[test]
    fn test_loan_exceeding_net_base_goes_negative() {
        // Net base 3000, loan installment 5000: fully deducted, net -2000.
        let lines = vec![
            DetailLine::new("BASIC", EntryCategory::Allowance, dec!(3000.0000)),
            DetailLine::new(TT_LOAN, EntryCategory::Deduction, dec!(5000.0000)),
        ];
        let sums = totals(&lines);
        assert_eq!(sums.net, dec!(-2000.0000));
    }

    #[test]
    fn test_resolve_version_first_calculation() {
        assert_eq!(resolve_version("EMP-1", "2026-01", None, false).unwrap(), 1);
    }

    #[test]
    fn test_resolve_version_duplicate_calculation_rejected() {
        let err = resolve_version("EMP-1", "2026-01", Some(1), false).unwrap_err();
        assert!(matches!(err, EngineError::BusinessRule(_)));
        assert!(err.to_string().contains("recalculation"));
    }

    #[test]
    fn test_resolve_version_recalculation_increments() {
        assert_eq!(resolve_version("EMP-1", "2026-01", Some(1), true).unwrap(), 2);
        assert_eq!(resolve_version("EMP-1", "2026-01", Some(4), true).unwrap(), 5);
    }

    #[test]
    fn test_resolve_version_recalculation_needs_prior() {
        let err = resolve_version("EMP-1", "2026-01", None, true).unwrap_err();
        assert!(matches!(err, EngineError::BusinessRule(_)));
    }

    // Mid-month salary changes, rehire within a month, and attendance edits
    // after approval are intentionally unasserted here: hire/termination
    // dates are the only proration inputs, and the recalculation path is
    // the designated escape hatch for post-approval changes.
}
