// handlers/elevated/mod.rs - Administrative handlers (admin role required)
//
// Middleware: session_auth_middleware, then require_admin_middleware
pub mod employees;
pub mod users;
