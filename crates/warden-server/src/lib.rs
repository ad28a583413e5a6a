//! Warden Server — HTTP surface for user and scope administration.
//!
//! Layout:
//! - `config.rs`: environment-driven configuration
//! - `telemetry.rs`: process-wide tracing subscriber
//! - `state.rs`: shared services handed to every handler
//! - `middleware.rs`: bearer-token scope gate
//! - `api/`: routes, request DTOs, and the response envelope

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use api::build_router;
pub use config::ServerConfig;
pub use state::AppState;
