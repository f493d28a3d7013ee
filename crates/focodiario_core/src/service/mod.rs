//! Core use-case services.
//!
//! # Responsibility
//! - Hold the active session and drive its state machine.
//! - Mirror the remote goal collection with remote-first mutations.
//! - Keep UI/FFI layers decoupled from remote adapter details.

pub mod goal_cache;
pub mod session_controller;
