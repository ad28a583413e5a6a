//! SurrealDB repository implementations.

mod scope;
mod user;

pub use scope::SurrealScopeRepository;
pub use user::SurrealUserRepository;
