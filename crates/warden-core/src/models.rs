//! Domain models for Warden.
//!
//! These are the core types shared across all crates.

pub mod role;
pub mod scope;
pub mod user;
