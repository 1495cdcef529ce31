pub mod jwt;
pub mod order_id;
pub mod pagination;
pub mod password;
pub mod phone;

pub use jwt::{Claims, JwtService};
pub use order_id::{build_order_id, parse_order_id};
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationParams};
pub use password::{hash_password, validate_password, verify_password};
pub use phone::validate_indonesian_phone;
