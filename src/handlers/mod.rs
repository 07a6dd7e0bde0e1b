// handlers/mod.rs - HTTP handlers
//
// Public: /health
// Account-scoped: /api/patch/v1/* (requires the account header, see middleware::account)
pub mod baselines;
pub mod health;
