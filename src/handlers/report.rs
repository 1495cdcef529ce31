use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::{AccessRequirement, require};
use crate::services::ReportService;

#[utoipa::path(
    get,
    path = "/api/v1/laporan/dashboard",
    tag = "report",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard aggregates"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn dashboard(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::AnyAdmin) {
        return Ok(e.error_response());
    }

    match report_service.dashboard_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/laporan/transparansi/{id}",
    tag = "report",
    params(("id" = i64, Path, description = "Program id")),
    responses(
        (status = 200, description = "Public transparency report"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn transparency(
    report_service: web::Data<ReportService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match report_service.transparency_report(path.into_inner()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": report
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/laporan")
            .route("/dashboard", web::get().to(dashboard))
            .route("/transparansi/{id}", web::get().to(transparency)),
    );
}
