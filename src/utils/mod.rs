//! Shared utilities: configuration constants, error types, big-integer
//! serialization helpers.

pub mod bigint;
pub mod config;
pub mod error;
