// handlers/protected/mod.rs - Protected handlers (valid session required)
//
// Middleware: session_auth_middleware inserts AuthUser into extensions
pub mod auth;
pub mod dadata;
pub mod inspections;
pub mod verification_areas;
