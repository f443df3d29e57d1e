//! # Medstock Client
//!
//! Front end for the medstock HTTP API.
//!
//! - [`MedicineClient`]: async HTTP client for every endpoint
//! - [`Presentation`]: UI state (cached list, the single expanded card, the action modal,
//!   status line) owned by the caller rather than held globally
//! - [`Controller`]: runs user actions against the API and reconciles [`Presentation`] with
//!   the server afterwards
//! - [`render`]: plain-text rendering of that state

pub mod client;
pub mod controller;
pub mod error;
pub mod presentation;
pub mod render;

pub use client::MedicineClient;
pub use controller::Controller;
pub use error::{ClientError, ClientResult};
pub use presentation::{ModalState, Presentation, SearchOutcome, StatusKind, StatusMessage};
