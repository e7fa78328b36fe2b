// handlers/mod.rs - Two handler tiers
//
// Public (no session) -> Protected (session gate, redirect to /auth when absent)
pub mod protected;
pub mod public;
