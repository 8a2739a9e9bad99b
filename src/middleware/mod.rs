pub mod auth;
pub mod response;

pub use auth::{AdminPrincipal, Principal};
pub use response::{ApiResponse, ApiResult};
