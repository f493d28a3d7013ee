//! Identity provider contracts and adapters.
//!
//! # Responsibility
//! - Define sign-in/sign-up/sign-out and session-change notification APIs.
//! - Isolate the username to login-email mapping.
//!
//! # See also
//! - `service::session_controller` for the state machine built on top.

pub mod login_email;
pub mod memory;
pub mod notify;
pub mod provider;
