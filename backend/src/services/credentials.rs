//! Credential lookups for machine-to-machine callers

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::ServiceIdentity;

/// Credential service backing the API key middleware
#[derive(Clone)]
pub struct CredentialService {
    db: PgPool,
}

impl CredentialService {
    /// Create a new CredentialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Resolve an opaque API key to its service identity.
    ///
    /// Returns `None` for unknown keys and for keys that have been
    /// deactivated; the two cases are indistinguishable to the caller.
    pub async fn resolve_key(&self, api_key: &str) -> AppResult<Option<ServiceIdentity>> {
        let row = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, service_name
            FROM api_clients
            WHERE api_key = $1
              AND is_active = true
            "#,
        )
        .bind(api_key)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(id, service_name)| ServiceIdentity { id, service_name }))
    }
}
