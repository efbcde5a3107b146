use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::config::Config;
use crate::engine::payroll;
use crate::error::EngineError;
use crate::model::salary::{SalaryDetail, SalaryHeader};
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct CalculatePayroll {
    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "2026-01")]
    pub month: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RecalculatePayroll {
    #[schema(example = "EMP-1001")]
    pub employee_no: String,

    #[schema(example = "2026-01")]
    pub month: String,

    #[schema(example = "Attendance corrected for Jan 12")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CalculateAllPayroll {
    #[schema(example = "2026-01")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollResponse {
    pub header: SalaryHeader,
    pub details: Vec<SalaryDetail>,
}

/// Calculate an employee's payroll for a month
#[utoipa::path(
    post,
    path = "/api/v1/payroll/calculate",
    request_body = CalculatePayroll,
    responses(
        (status = 200, description = "Payroll calculated", body = SalaryHeader),
        (status = 400, description = "Ineligible contract type or month already calculated", body = Object, example = json!({
            "message": "Payroll for EMP-1001 2026-01 is already calculated; use the recalculation path"
        })),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn calculate_payroll(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CalculatePayroll>,
) -> actix_web::Result<impl Responder> {
    let header = payroll::calculate(
        pool.get_ref(),
        config.get_ref(),
        &payload.employee_no,
        &payload.month,
    )
    .await?;

    Ok(HttpResponse::Ok().json(header))
}

/// Recalculate an already-calculated month, producing version N+1
#[utoipa::path(
    post,
    path = "/api/v1/payroll/recalculate",
    request_body = RecalculatePayroll,
    responses(
        (status = 200, description = "New payroll version stored", body = SalaryHeader),
        (status = 400, description = "Missing reason or no prior version"),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn recalculate_payroll(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<RecalculatePayroll>,
) -> actix_web::Result<impl Responder> {
    let header = payroll::recalculate(
        pool.get_ref(),
        config.get_ref(),
        &payload.employee_no,
        &payload.month,
        &payload.reason,
    )
    .await?;

    Ok(HttpResponse::Ok().json(header))
}

/// Run payroll for every eligible employee; failures are reported per employee
#[utoipa::path(
    post,
    path = "/api/v1/payroll/calculate-all",
    request_body = CalculateAllPayroll,
    responses(
        (status = 200, description = "Batch finished", body = crate::engine::payroll::BatchOutcome),
        (status = 400, description = "Malformed month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn calculate_all(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CalculateAllPayroll>,
) -> actix_web::Result<impl Responder> {
    let outcome =
        payroll::calculate_for_all(pool.get_ref(), config.get_ref(), &payload.month).await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// Latest payroll version with its detail lines
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{employee_no}/{month}",
    params(
        ("employee_no" = String, Path, description = "Employee number"),
        ("month" = String, Path, description = "Salary month, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Latest payroll version", body = PayrollResponse),
        (status = 404, description = "No payroll for this employee and month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    pool: web::Data<MySqlPool>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_no, month) = path.into_inner();

    let header = store::payroll::latest_header(pool.get_ref(), &employee_no, &month)
        .await
        .map_err(EngineError::from)?
        .ok_or_else(|| {
            EngineError::not_found(format!("Payroll for {employee_no} {month}"))
        })?;

    let details = store::payroll::details_for(pool.get_ref(), header.id)
        .await
        .map_err(EngineError::from)?;

    Ok(HttpResponse::Ok().json(PayrollResponse { header, details }))
}
