use crate::api::attendance::{CheckInRequest, CheckOutRequest, ManualEntryRequest};
use crate::api::payroll::{
    CalculateAllPayroll, CalculatePayroll, PayrollResponse, RecalculatePayroll,
};
use crate::engine::attendance::{CheckInOutput, CheckOutOutput};
use crate::engine::payroll::{BatchFailure, BatchOutcome};
use crate::model::YesNo;
use crate::model::adjustment::{EntryCategory, EntryStatus, MonthlyAdjustment};
use crate::model::attendance::AttendanceRecord;
use crate::model::salary::{ApprovalStatus, SalaryDetail, SalaryHeader, SalaryType};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Payroll Engine API",
        version = "1.0.0",
        description = r#"
## Attendance-to-Payroll Calculation Engine

Computes employee work-time metrics from geo-validated check-in/check-out
events and aggregates them, together with recurring salary components and
loan obligations, into versioned monthly payroll records.

### 🔹 Key Features
- **Attendance**
  - Geo-validated check-in/check-out against project sites
  - Working hours, overtime, lateness, early-departure and shortage metrics
  - Manual HR entry/edit bypassing GPS validation
- **Payroll**
  - Prorated monthly calculation with salary-breakdown expansion
  - Allowance/deduction/loan aggregation into versioned salary records
  - Recalculation path producing version N+1 with an audit reason
  - Batch calculation across all eligible employees

### 📦 Response Format
- JSON-based RESTful responses
- Business-rule rejections carry a descriptive `message`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::manual_entry,

        crate::api::payroll::calculate_payroll,
        crate::api::payroll::recalculate_payroll,
        crate::api::payroll::calculate_all,
        crate::api::payroll::get_payroll
    ),
    components(
        schemas(
            CheckInRequest,
            CheckOutRequest,
            ManualEntryRequest,
            CheckInOutput,
            CheckOutOutput,
            AttendanceRecord,
            CalculatePayroll,
            RecalculatePayroll,
            CalculateAllPayroll,
            PayrollResponse,
            SalaryHeader,
            SalaryDetail,
            BatchOutcome,
            BatchFailure,
            MonthlyAdjustment,
            YesNo,
            ApprovalStatus,
            SalaryType,
            EntryCategory,
            EntryStatus
        )
    ),
    tags(
        (name = "Attendance", description = "Check-in/check-out and manual attendance APIs"),
        (name = "Payroll", description = "Monthly payroll calculation APIs"),
    )
)]
pub struct ApiDoc;
