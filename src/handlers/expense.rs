use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::{AccessRequirement, require};
use crate::models::*;
use crate::services::ExpenseService;

#[utoipa::path(
    post,
    path = "/api/v1/pengeluaran",
    tag = "expense",
    security(("bearer_auth" = [])),
    request_body = CreateExpenseRequest,
    responses(
        (status = 200, description = "Expense recorded"),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Requires the Admin Program title")
    )
)]
pub async fn create_expense(
    expense_service: web::Data<ExpenseService>,
    req: HttpRequest,
    request: web::Json<CreateExpenseRequest>,
) -> Result<HttpResponse> {
    let user = match require(&req, AccessRequirement::Admin(Jabatan::AdminProgram)) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match expense_service
        .create_expense(user.user_id, request.into_inner())
        .await
    {
        Ok(expense) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": expense
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/pengeluaran",
    tag = "expense",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size"),
        ("kegiatan_id" = Option<i64>, Query, description = "Filter by program")
    ),
    responses(
        (status = 200, description = "Expense listing"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_expenses(
    expense_service: web::Data<ExpenseService>,
    req: HttpRequest,
    query: web::Query<ExpenseQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require(&req, AccessRequirement::AnyAdmin) {
        return Ok(e.error_response());
    }

    match expense_service.list_expenses(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn expense_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pengeluaran")
            .route("", web::post().to(create_expense))
            .route("", web::get().to(list_expenses)),
    );
}
