//! HTTP handlers for the Air Quality Monitor backend

pub mod alerts;
pub mod ingest;
pub mod metrics;
pub mod stations;

pub use alerts::*;
pub use ingest::*;
pub use metrics::*;
pub use stations::*;
