pub mod admin;
pub mod auth;
pub mod donation;
pub mod expense;
pub mod program;
pub mod report;
pub mod user;
pub mod webhook;

pub use admin::admin_config;
pub use auth::auth_config;
pub use donation::donation_config;
pub use expense::expense_config;
pub use program::program_config;
pub use report::report_config;
pub use user::user_config;
pub use webhook::webhook_config;
