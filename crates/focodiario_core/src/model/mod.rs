//! Domain model for goals, categories and authenticated identities.
//!
//! # Responsibility
//! - Define the canonical records shared by cache, adapters and views.
//! - Keep wire names stable so remote rows decode without remapping.
//!
//! # Invariants
//! - `Goal::id` is assigned by the remote store and never minted locally.
//! - `Category` membership is closed; unknown labels are rejected.

pub mod category;
pub mod goal;
pub mod identity;
