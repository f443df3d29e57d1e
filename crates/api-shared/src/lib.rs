//! # API Shared
//!
//! Shared definitions for the medstock HTTP API.
//!
//! Contains:
//! - Request and response types (`wire` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` on the server side and by `medstock-client` on the client side, so both
//! ends agree on field names.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
