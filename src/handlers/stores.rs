use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Store;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{authorize_store_owner, StoreService};

#[derive(Debug, Deserialize)]
pub struct StorePayload {
    pub name: Option<String>,
}

/// POST /api/stores - create a store owned by the caller
pub async fn create(
    user: CurrentUser,
    payload: Result<Json<StorePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let pool = DatabaseManager::pool().await?;

    let store = StoreService::create(&pool, &user.user_id, payload.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// PATCH /api/stores/:store_id - rename, owner only
pub async fn update(
    user: CurrentUser,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<StorePayload>, JsonRejection>,
) -> Result<Json<Store>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let pool = DatabaseManager::pool().await?;

    authorize_store_owner(&pool, &user.user_id, store_id).await?;

    let store = StoreService::rename(&pool, store_id, payload.name.as_deref()).await?;
    Ok(Json(store))
}

/// DELETE /api/stores/:store_id - delete, owner only; echoes the deleted store
pub async fn remove(user: CurrentUser, Path(store_id): Path<Uuid>) -> Result<Json<Store>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    authorize_store_owner(&pool, &user.user_id, store_id).await?;

    let store = StoreService::remove(&pool, store_id).await?;
    Ok(Json(store))
}
