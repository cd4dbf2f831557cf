use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_token, Claims};
use crate::config;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub user_id: Option<String>,
}

/// POST /auth/token - development-only stand-in for the identity provider:
/// exchanges a user id for a signed session token. Disabled in production
/// config, where a real provider signs tokens with the shared secret.
pub async fn mint_token(payload: Result<Json<TokenRequest>, JsonRejection>) -> Result<Json<Value>, ApiError> {
    if !config::config().security.enable_token_mint {
        return Err(ApiError::not_found("Not found"));
    }

    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let user_id = match payload.user_id.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => return Err(ApiError::validation("userId", "User ID is required")),
    };

    let token = generate_token(Claims::new(user_id)).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to generate token")
    })?;

    Ok(Json(json!({ "token": token })))
}
