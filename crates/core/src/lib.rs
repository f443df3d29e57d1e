//! # Medstock Core
//!
//! Core business logic for the medstock inventory.
//!
//! This crate contains pure data operations and file management:
//! - The JSON document store under the configured data file
//! - Validated create/update/delete of medicine records
//! - The average-price aggregate
//!
//! **No API concerns**: HTTP servers, wire types and client code belong in `api-rest`,
//! `api-shared` and `medstock-client`.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod service;
pub mod store;

pub use aggregate::PriceAggregate;
pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_FILE;
pub use error::{ErrorKind, MedicineError, MedicineResult, StorageError};
pub use service::{MedicineService, MedicineUpdate};
pub use store::{Document, MedicineStore, StoredMedicine};
