//! Remote data contracts and implementations.
//!
//! # Responsibility
//! - Define the row-level CRUD contract over the remote `goals` collection.
//! - Provide an in-memory implementation with the same scoping rules.
//!
//! # Invariants
//! - Every call is scoped by the caller's `Session`; rows of other owners are
//!   invisible.
//! - Implementations never mutate caller-side state.

pub mod goal_repo;
pub mod memory_repo;
