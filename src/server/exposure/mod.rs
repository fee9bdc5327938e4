//! API exposure layers
//!
//! An exposure consumes a [`ServerHost`](super::host::ServerHost) and turns it
//! into a transport-specific router.

pub mod rest;

pub use rest::RestExposure;
