use super::YesNo;

/// Project site used for geo-proximity checks, read-only to this engine.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectSite {
    pub project_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub require_location_check: YesNo,
}
