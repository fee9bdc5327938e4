//! Server module exposing the course library over HTTP
//!
//! `ServerBuilder` assembles a [`ServerHost`] from configuration and resource
//! stores; the REST exposure turns the host into an axum router.

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::AppState;
pub use host::ServerHost;
