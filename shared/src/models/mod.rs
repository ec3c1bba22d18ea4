//! Data models shared across the platform

pub mod alerts;
pub mod metrics;
pub mod readings;

pub use alerts::*;
pub use metrics::*;
pub use readings::*;
