//! Business logic services for the Air Quality Monitor backend

pub mod alerts;
pub mod credentials;
pub mod ingest;
pub mod metrics;
pub mod ranking;

pub use alerts::AlertService;
pub use credentials::CredentialService;
pub use ingest::IngestService;
pub use metrics::MetricsService;
pub use ranking::RankingService;
