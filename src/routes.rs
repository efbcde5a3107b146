use crate::{
    api::{attendance, payroll},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let attendance_limiter = build_limiter(config.rate_attendance_per_min);
    let payroll_limiter = build_limiter(config.rate_payroll_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in")
                            .wrap(Governor::new(&attendance_limiter))
                            .route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out")
                            .wrap(Governor::new(&attendance_limiter))
                            .route(web::post().to(attendance::check_out)),
                    )
                    // /attendance/manual (HR edits, no GPS validation)
                    .service(
                        web::resource("/manual")
                            .wrap(Governor::new(&attendance_limiter))
                            .route(web::put().to(attendance::manual_entry)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll/calculate
                    .service(
                        web::resource("/calculate")
                            .wrap(Governor::new(&payroll_limiter))
                            .route(web::post().to(payroll::calculate_payroll)),
                    )
                    // /payroll/recalculate
                    .service(
                        web::resource("/recalculate")
                            .wrap(Governor::new(&payroll_limiter))
                            .route(web::post().to(payroll::recalculate_payroll)),
                    )
                    // /payroll/calculate-all
                    .service(
                        web::resource("/calculate-all")
                            .wrap(Governor::new(&payroll_limiter))
                            .route(web::post().to(payroll::calculate_all)),
                    )
                    // /payroll/{employee_no}/{month}
                    .service(
                        web::resource("/{employee_no}/{month}")
                            .route(web::get().to(payroll::get_payroll)),
                    ),
            ),
    );
}
