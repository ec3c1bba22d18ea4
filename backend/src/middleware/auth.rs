//! API key authentication middleware
//!
//! Machine-to-machine callers present an opaque key in the X-API-Key header;
//! the key resolves to a service identity in the api_clients table before any
//! handler runs.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, ErrorDetail, ErrorResponse};
use crate::services::CredentialService;
use crate::AppState;

/// Header carrying the caller's opaque credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Resolved caller identity attached to authenticated requests.
#[derive(Clone, Debug)]
pub struct ServiceIdentity {
    pub id: uuid::Uuid,
    pub service_name: String,
}

/// Authentication middleware that validates the API key against the active
/// credential table and injects the resolved [`ServiceIdentity`].
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let Some(key) = key else {
        return AppError::MissingApiKey.into_response();
    };

    let service = CredentialService::new(state.db.clone());
    match service.resolve_key(&key).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Ok(None) => AppError::InvalidApiKey.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Extractor for the authenticated service
/// Use this in handlers to learn which caller is on the line
#[derive(Clone, Debug)]
pub struct CurrentService(pub ServiceIdentity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentService
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ServiceIdentity>()
            .cloned()
            .map(CurrentService)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
