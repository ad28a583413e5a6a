//! Warden Admin — the permission mutation services.
//!
//! [`UserService`] and [`ScopeService`] are generic over the store and
//! cache contracts in `warden-core`, so this crate has no dependency on
//! any database or cache driver.

pub mod email;
pub mod scope;
pub mod user;

pub use scope::ScopeService;
pub use user::{CreateUserInput, UserService};
