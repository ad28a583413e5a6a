//! Warden Core — domain models, error taxonomy, and the store/cache
//! contracts shared by every other crate.

pub mod cache;
pub mod error;
pub mod models;
pub mod repository;

pub use cache::{SessionCache, session_marker_key};
pub use error::{ErrorKind, WardenError, WardenResult};
