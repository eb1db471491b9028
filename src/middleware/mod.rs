pub mod auth;
pub mod cookie;
pub mod response;

pub use auth::{require_admin_middleware, session_auth_middleware, AuthUser};
pub use cookie::{expired_session_cookie, read_cookie, session_cookie};
pub use response::{ApiResponse, ApiResult};
