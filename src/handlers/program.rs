use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::{AccessRequirement, require};
use crate::models::*;
use crate::services::ProgramService;

#[utoipa::path(
    get,
    path = "/api/v1/kegiatan",
    tag = "program",
    responses(
        (status = 200, description = "Active programs with collected totals")
    )
)]
pub async fn list_programs(program_service: web::Data<ProgramService>) -> Result<HttpResponse> {
    match program_service.list_active_with_totals().await {
        Ok(programs) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": programs
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/kegiatan/{id}",
    tag = "program",
    params(("id" = i64, Path, description = "Program id")),
    responses(
        (status = 200, description = "Program detail with collected total"),
        (status = 404, description = "Program not found")
    )
)]
pub async fn get_program(
    program_service: web::Data<ProgramService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match program_service.get_with_total(path.into_inner()).await {
        Ok(program) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": program
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/kegiatan",
    tag = "program",
    security(("bearer_auth" = [])),
    request_body = CreateProgramRequest,
    responses(
        (status = 200, description = "Program created as Draft"),
        (status = 403, description = "Requires the Admin Program title")
    )
)]
pub async fn create_program(
    program_service: web::Data<ProgramService>,
    req: HttpRequest,
    request: web::Json<CreateProgramRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::Admin(Jabatan::AdminProgram)) {
        return Ok(e.error_response());
    }

    match program_service.create_program(request.into_inner()).await {
        Ok(program) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": program
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/kegiatan/{id}/status",
    tag = "program",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Program id")),
    request_body = UpdateProgramStatusRequest,
    responses(
        (status = 200, description = "Program status advanced"),
        (status = 409, description = "Transition out of order")
    )
)]
pub async fn update_program_status(
    program_service: web::Data<ProgramService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateProgramStatusRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::Admin(Jabatan::AdminProgram)) {
        return Ok(e.error_response());
    }

    match program_service
        .update_status(path.into_inner(), request.into_inner())
        .await
    {
        Ok(program) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": program
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/kegiatan/{id}/poster",
    tag = "program",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Program id")),
    request_body(content = Vec<u8>, content_type = "image/png"),
    responses(
        (status = 200, description = "Poster replaced"),
        (status = 400, description = "Unsupported image type")
    )
)]
pub async fn update_poster(
    program_service: web::Data<ProgramService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::Admin(Jabatan::AdminProgram)) {
        return Ok(e.error_response());
    }

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match program_service
        .update_poster(path.into_inner(), body.to_vec(), &content_type)
        .await
    {
        Ok(program) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": program
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn program_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/kegiatan")
            .route("", web::get().to(list_programs))
            .route("", web::post().to(create_program))
            .route("/{id}", web::get().to(get_program))
            .route("/{id}/status", web::put().to(update_program_status))
            .route("/{id}/poster", web::put().to(update_poster)),
    );
}
