use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::auth;
use crate::error::ApiError;

/// Authenticated caller identity, resolved once per request from the bearer
/// session token. Mutating handlers take this as an explicit argument; list
/// and detail handlers stay public by simply not asking for it.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthenticated)?;

        let claims = auth::verify_token(&token).map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            ApiError::unauthenticated("Unauthenticated")
        })?;

        Ok(CurrentUser { user_id: claims.sub })
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty session token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
