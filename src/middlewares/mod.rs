pub mod auth;
pub mod cors;
pub mod policy;

pub use auth::AuthMiddleware;
pub use cors::create_cors;
pub use policy::{AccessRequirement, authorize, require};
