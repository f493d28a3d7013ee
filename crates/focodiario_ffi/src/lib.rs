//! Flutter bridge crate for the goal tracker core.

pub mod api;
