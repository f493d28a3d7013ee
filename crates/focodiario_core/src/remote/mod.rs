//! Hosted backend adapter.
//!
//! # Responsibility
//! - Implement `GoalRepository` and `IdentityProvider` over the backend's
//!   REST data API and auth API.
//! - Keep wire row shapes and HTTP status mapping inside this module.
//!
//! # Invariants
//! - Access tokens and the API key never reach log output.

mod rows;
pub mod supabase;
