use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::user::get_me,
        handlers::user::update_me,
        handlers::donation::create_donation,
        handlers::donation::get_my_donations,
        handlers::donation::get_tracking,
        handlers::donation::set_tracking_number,
        handlers::admin::list_donations,
        handlers::admin::verify_donation,
        handlers::admin::update_pickup_status,
        handlers::admin::mark_delivered,
        handlers::program::list_programs,
        handlers::program::get_program,
        handlers::program::create_program,
        handlers::program::update_program_status,
        handlers::program::update_poster,
        handlers::expense::create_expense,
        handlers::expense::list_expenses,
        handlers::report::dashboard,
        handlers::report::transparency,
    ),
    components(
        schemas(
            Role,
            Jabatan,
            User,
            Donatur,
            Admin,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            UserResponse,
            ProfileResponse,
            UpdateProfileRequest,
            DonationStatus,
            DonationKind,
            PaymentMethod,
            DeliveryMethod,
            Donation,
            PickupDetails,
            CreateDonationRequest,
            CreateDonationResponse,
            VerifyDonationRequest,
            SetTrackingNumberRequest,
            DonationQuery,
            PickupStatus,
            PickupSchedule,
            UpdatePickupStatusRequest,
            TrackingResponse,
            ProgramStatus,
            Program,
            ProgramWithTotal,
            CreateProgramRequest,
            UpdateProgramStatusRequest,
            ExpenseKind,
            Expense,
            CreateExpenseRequest,
            ExpenseQuery,
            StatusCount,
            KindCount,
            DeliveryCount,
            TrendPoint,
            DashboardStats,
            ProgramSummary,
            IncomeEntry,
            TransparencyReport,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "Profile API"),
        (name = "donation", description = "Donor donation API"),
        (name = "admin", description = "Donation administration API"),
        (name = "program", description = "Fundraising program API"),
        (name = "expense", description = "Expense recording API"),
        (name = "report", description = "Aggregation and transparency API"),
    ),
    info(
        title = "Peduli Backend API",
        version = "1.0.0",
        description = "Donation management REST API documentation"
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
