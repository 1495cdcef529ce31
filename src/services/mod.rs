pub mod auth_service;
pub mod donation_service;
pub mod expense_service;
pub mod logistics_service;
pub mod program_service;
pub mod report_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use donation_service::DonationService;
pub use expense_service::ExpenseService;
pub use logistics_service::LogisticsService;
pub use program_service::ProgramService;
pub use report_service::ReportService;
pub use user_service::UserService;
