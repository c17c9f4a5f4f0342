pub mod auth;
pub mod response;
pub mod service_auth;
pub mod validate_profile;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use service_auth::service_key_middleware;
pub use validate_profile::{validate_profile_middleware, ValidatedProfile};
