use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::{AccessRequirement, require};
use crate::models::*;
use crate::services::{DonationService, LogisticsService};

#[utoipa::path(
    post,
    path = "/api/v1/donasi",
    tag = "donation",
    security(("bearer_auth" = [])),
    request_body = CreateDonationRequest,
    responses(
        (status = 200, description = "Donation submitted", body = CreateDonationResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not a donor")
    )
)]
pub async fn create_donation(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
    request: web::Json<CreateDonationRequest>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Donor) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match donation_service
        .create_donation(user.user_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/donasi",
    tag = "donation",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "The caller's own donations"),
        (status = 403, description = "Caller is not a donor")
    )
)]
pub async fn get_my_donations(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
    query: web::Query<DonationQuery>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Donor) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match donation_service
        .get_donor_donations(user.user_id, &query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/donasi/{id}/tracking",
    tag = "donation",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation id")),
    responses(
        (status = 200, description = "Tracking view", body = TrackingResponse),
        (status = 404, description = "Donation not found or not the caller's")
    )
)]
pub async fn get_tracking(
    logistics_service: web::Data<LogisticsService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Donor) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match logistics_service
        .get_tracking(user.user_id, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/donasi/{id}/resi",
    tag = "donation",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation id")),
    request_body = SetTrackingNumberRequest,
    responses(
        (status = 200, description = "Tracking number recorded"),
        (status = 404, description = "No matching pending self-delivery donation")
    )
)]
pub async fn set_tracking_number(
    logistics_service: web::Data<LogisticsService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SetTrackingNumberRequest>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Donor) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match logistics_service
        .set_tracking_number(user.user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn donation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/donasi")
            .route("", web::post().to(create_donation))
            .route("", web::get().to(get_my_donations))
            .route("/{id}/tracking", web::get().to(get_tracking))
            .route("/{id}/resi", web::put().to(set_tracking_number)),
    );
}
