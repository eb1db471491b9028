// handlers/public/mod.rs - Public handlers (no session required)
//
// Route Prefix: served at the root and under /api
// Middleware: none
pub mod auth;
pub mod health;
