use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::{AccessRequirement, require};
use crate::models::*;
use crate::services::{DonationService, LogisticsService};

#[utoipa::path(
    get,
    path = "/api/v1/admin/donasi",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("jenis" = Option<String>, Query, description = "Filter by donation kind"),
        ("metode_pengiriman" = Option<String>, Query, description = "Filter by delivery method"),
        ("kegiatan_id" = Option<i64>, Query, description = "Filter by program")
    ),
    responses(
        (status = 200, description = "Donation listing"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_donations(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
    query: web::Query<DonationQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::AnyAdmin) {
        return Ok(e.error_response());
    }

    match donation_service.list_donations(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/donasi/{id}/verifikasi",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation id")),
    request_body = VerifyDonationRequest,
    responses(
        (status = 200, description = "Donation verified"),
        (status = 403, description = "Requires the Admin Operasional title"),
        (status = 409, description = "Donation is no longer pending")
    )
)]
pub async fn verify_donation(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<VerifyDonationRequest>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Admin(Jabatan::AdminOperasional)) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match donation_service
        .verify_donation(user.user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(donation) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": donation
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/donasi/{id}/penjemputan",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation id")),
    request_body = UpdatePickupStatusRequest,
    responses(
        (status = 200, description = "Pickup status updated"),
        (status = 404, description = "No pickup schedule for this donation")
    )
)]
pub async fn update_pickup_status(
    logistics_service: web::Data<LogisticsService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePickupStatusRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::Admin(Jabatan::AdminOperasional)) {
        return Ok(e.error_response());
    }

    match logistics_service
        .update_pickup_status(path.into_inner(), request.into_inner())
        .await
    {
        Ok(schedule) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": schedule
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/donasi/{id}/selesai",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation id")),
    responses(
        (status = 200, description = "Handoff recorded"),
        (status = 400, description = "Not a goods donation")
    )
)]
pub async fn mark_delivered(
    logistics_service: web::Data<LogisticsService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::Admin(Jabatan::AdminOperasional)) {
        return Ok(e.error_response());
    }

    match logistics_service.mark_delivered(path.into_inner()).await {
        Ok(schedule) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": schedule
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/donasi")
            .route("", web::get().to(list_donations))
            .route("/{id}/verifikasi", web::put().to(verify_donation))
            .route("/{id}/penjemputan", web::put().to(update_pickup_status))
            .route("/{id}/selesai", web::put().to(mark_delivered)),
    );
}
