// handlers/mod.rs - Three handler tiers
//
// Public (no session) -> Protected (session cookie) -> Elevated (admin role)
pub mod elevated;
pub mod protected;
pub mod public;
