//! API middleware and request context

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::info;

use core_kernel::OperationMetadata;

/// Header carrying the acting user
pub const ACTOR_HEADER: &str = "x-user-id";

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ANONYMOUS: &str = "anonymous";

/// Who is making the request, taken from [`ACTOR_HEADER`]
///
/// Authentication happens upstream; this only reads the forwarded identity.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub request_id: Option<String>,
}

impl Actor {
    fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_id: header_value(headers, ACTOR_HEADER).unwrap_or_else(|| ANONYMOUS.to_string()),
            request_id: header_value(headers, REQUEST_ID_HEADER),
        }
    }

    /// Operation metadata for service calls
    pub fn metadata(&self) -> OperationMetadata {
        let metadata = OperationMetadata::initiated_by(self.user_id.clone());
        match &self.request_id {
            Some(id) => metadata.with_correlation_id(id.clone()),
            None => metadata,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Actor::from_headers(&parts.headers))
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Audit logging middleware
///
/// Logs every API request with its actor, outcome and latency
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let actor = Actor::from_headers(request.headers());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %actor.user_id,
        request_id = actor.request_id.as_deref().unwrap_or("-"),
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
