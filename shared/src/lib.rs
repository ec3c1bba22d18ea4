//! Shared types and domain logic for the Air Quality Monitor platform
//!
//! This crate contains the types and pure rules shared between the backend
//! API, the ingestion poller, and the alert dispatcher.

pub mod alerts;
pub mod models;
pub mod ranking;
pub mod types;
pub mod validation;

pub use alerts::*;
pub use models::*;
pub use ranking::*;
pub use types::*;
pub use validation::*;
