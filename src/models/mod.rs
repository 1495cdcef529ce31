pub mod common;
pub mod donation;
pub mod expense;
pub mod logistics;
pub mod program;
pub mod report;
pub mod user;

pub use common::*;
pub use donation::*;
pub use expense::*;
pub use logistics::*;
pub use program::*;
pub use report::*;
pub use user::*;
