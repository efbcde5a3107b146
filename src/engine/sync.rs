//! Rewrites the monthly allowance/deduction entries derived from a single
//! attendance record. Only system-generated rows are replaced; manual HR
//! entries for the same date are never touched.

use rust_decimal::prelude::*;
use sqlx::MySqlConnection;

use crate::consts::{
    FALLBACK_DAILY_HOURS, MONEY_DP, PRORATION_DAYS, TT_ABSENCE, TT_EARLY_OUT, TT_LATE,
    TT_OVERTIME, TT_SHORTAGE,
};
use crate::model::YesNo;
use crate::model::adjustment::{EntryCategory, EntryStatus, NewAdjustment};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::store;

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-hour valuation of attendance metrics: the monthly salary spread over
/// thirty scheduled days.
pub fn hourly_rate(monthly_salary: Decimal, scheduled_hours: Decimal) -> Decimal {
    let daily_hours = if scheduled_hours > Decimal::ZERO {
        scheduled_hours
    } else {
        FALLBACK_DAILY_HOURS
    };
    monthly_salary / (PRORATION_DAYS * daily_hours)
}

/// Entries a closed record produces: at most one overtime allowance plus a
/// deduction per non-zero lateness/early-out/shortage metric, and a one-day
/// salary deduction for an absence. Zero metrics produce nothing.
pub fn derive_entries(employee: &Employee, record: &AttendanceRecord) -> Vec<NewAdjustment> {
    let scheduled = record.scheduled_hours.unwrap_or(FALLBACK_DAILY_HOURS);
    let rate = hourly_rate(employee.monthly_salary, scheduled);

    let mut entries = Vec::new();
    let mut push = |code: &str, category: EntryCategory, amount: Decimal| {
        if amount > Decimal::ZERO {
            entries.push(NewAdjustment {
                employee_no: record.employee_no.clone(),
                trans_type_code: code.to_string(),
                trans_category: category,
                amount,
                effective_date: record.attendance_date,
                status: EntryStatus::Active,
                is_system: YesNo::Yes,
                source_date: Some(record.attendance_date),
            });
        }
    };

    if let Some(overtime) = record.overtime_calc {
        push(TT_OVERTIME, EntryCategory::Allowance, money(rate * overtime));
    }
    if let Some(delayed) = record.delayed_calc {
        push(TT_LATE, EntryCategory::Deduction, money(rate * delayed));
    }
    if let Some(early_out) = record.early_out_calc {
        push(TT_EARLY_OUT, EntryCategory::Deduction, money(rate * early_out));
    }
    if let Some(shortage) = record.shortage_hours {
        push(TT_SHORTAGE, EntryCategory::Deduction, money(rate * shortage));
    }
    if record.absence_flag.as_bool() {
        push(
            TT_ABSENCE,
            EntryCategory::Deduction,
            money(employee.monthly_salary / PRORATION_DAYS),
        );
    }

    entries
}

/// Bring the month's system entries for this record's date in line with the
/// record's current state. Safe to re-run after any edit; stale entries are
/// cleared even when the record no longer produces any.
pub async fn sync_record(
    conn: &mut MySqlConnection,
    employee: &Employee,
    record: &AttendanceRecord,
) -> Result<(), sqlx::Error> {
    let entries = derive_entries(employee, record);
    tracing::debug!(
        employee_no = %record.employee_no,
        date = %record.attendance_date,
        entries = entries.len(),
        "Synchronizing attendance-derived entries"
    );
    store::adjustments::replace_system_for_date(
        conn,
        &record.employee_no,
        record.attendance_date,
        &entries,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn employee(salary: Decimal) -> Employee {
        Employee {
            employee_no: "EMP-1001".to_string(),
            monthly_salary: salary,
            category: "STAFF".to_string(),
            contract_type: "permanent".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            termination_date: None,
            department_id: Some(10),
            project_code: Some("PRJ-01".to_string()),
        }
    }

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            transaction_id: "txn-1".to_string(),
            employee_no: "EMP-1001".to_string(),
            attendance_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            project_code: Some("PRJ-01".to_string()),
            entry_time: None,
            exit_time: None,
            entry_latitude: None,
            entry_longitude: None,
            exit_latitude: None,
            exit_longitude: None,
            entry_distance_meters: None,
            exit_distance_meters: None,
            scheduled_hours: Some(dec!(8.00)),
            working_hours: None,
            overtime_calc: None,
            delayed_calc: None,
            early_out_calc: None,
            shortage_hours: None,
            absence_flag: YesNo::No,
            absence_reason: None,
            is_holiday_work: YesNo::No,
            is_weekend_work: YesNo::No,
            is_manual_entry: YesNo::No,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_hourly_rate_spreads_salary_over_thirty_days() {
        // 4800 / (30 * 8h) = 20 per hour
        assert_eq!(hourly_rate(dec!(4800), dec!(8)), dec!(20));
    }

    #[test]
    fn test_hourly_rate_falls_back_on_zero_schedule() {
        assert_eq!(hourly_rate(dec!(4800), Decimal::ZERO), dec!(20));
    }

    #[test]
    fn test_overtime_becomes_single_allowance() {
        let mut rec = record();
        rec.overtime_calc = Some(dec!(2.00));
        let entries = derive_entries(&employee(dec!(4800)), &rec);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trans_type_code, TT_OVERTIME);
        assert_eq!(entries[0].trans_category, EntryCategory::Allowance);
        assert_eq!(entries[0].amount, dec!(40.0000));
        assert_eq!(entries[0].is_system, YesNo::Yes);
        assert_eq!(entries[0].source_date, Some(rec.attendance_date));
    }

    #[test]
    fn test_metric_deductions_valued_at_hourly_rate() {
        let mut rec = record();
        rec.delayed_calc = Some(dec!(0.50));
        rec.early_out_calc = Some(dec!(1.00));
        rec.shortage_hours = Some(dec!(1.50));
        let entries = derive_entries(&employee(dec!(4800)), &rec);
        let codes: Vec<_> = entries.iter().map(|e| e.trans_type_code.as_str()).collect();
        assert_eq!(codes, vec![TT_LATE, TT_EARLY_OUT, TT_SHORTAGE]);
        assert!(entries.iter().all(|e| e.trans_category == EntryCategory::Deduction));
        assert_eq!(entries[0].amount, dec!(10.0000));
        assert_eq!(entries[1].amount, dec!(20.0000));
        assert_eq!(entries[2].amount, dec!(30.0000));
    }

    #[test]
    fn test_absence_deducts_one_day_of_salary() {
        let mut rec = record();
        rec.absence_flag = YesNo::Yes;
        let entries = derive_entries(&employee(dec!(6000)), &rec);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trans_type_code, TT_ABSENCE);
        assert_eq!(entries[0].amount, dec!(200.0000));
    }

    #[test]
    fn test_zero_metrics_produce_no_entries() {
        let mut rec = record();
        rec.overtime_calc = Some(Decimal::ZERO);
        rec.delayed_calc = Some(Decimal::ZERO);
        rec.early_out_calc = Some(Decimal::ZERO);
        rec.shortage_hours = Some(Decimal::ZERO);
        assert!(derive_entries(&employee(dec!(4800)), &rec).is_empty());
    }
}
