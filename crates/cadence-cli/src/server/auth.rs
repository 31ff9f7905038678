use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;

/// Header the upstream authentication layer forwards the caller's id in.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Missing or malformed identity is a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Requester {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<Uuid>().ok())
            .map(Requester)
            .ok_or(ApiError::Unauthorized)
    }
}
