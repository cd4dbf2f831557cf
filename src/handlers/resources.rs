use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::{authorize_store_owner, ResourceKind, ResourceService};

/// GET /api/:store_id/{kind} - public list with optional exact-match filters
pub async fn list<K: ResourceKind>(
    Path(store_id): Path<Uuid>,
    Query(filters): Query<HashMap<String, String>>,
) -> Result<Json<Vec<K::Row>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let rows = ResourceService::<K>::list(&pool, store_id, &filters).await?;
    Ok(Json(rows))
}

/// GET /api/:store_id/{kind}/:id - public detail; absent ids echo JSON null
pub async fn detail<K: ResourceKind>(
    Path((_store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Option<K::Row>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let row = ResourceService::<K>::get(&pool, id).await?;
    Ok(Json(row))
}

/// POST /api/:store_id/{kind} - create, owner only
pub async fn create<K: ResourceKind>(
    user: CurrentUser,
    Path(store_id): Path<Uuid>,
    payload: Result<Json<K::Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<K::Row>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let pool = DatabaseManager::pool().await?;

    authorize_store_owner(&pool, &user.user_id, store_id).await?;

    let row = ResourceService::<K>::create(&pool, store_id, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/:store_id/{kind}/:id - full-field replacement, owner only
pub async fn update<K: ResourceKind>(
    user: CurrentUser,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<K::Payload>, JsonRejection>,
) -> Result<Json<K::Row>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let pool = DatabaseManager::pool().await?;

    authorize_store_owner(&pool, &user.user_id, store_id).await?;

    let row = ResourceService::<K>::update(&pool, store_id, id, payload).await?;
    Ok(Json(row))
}

/// DELETE /api/:store_id/{kind}/:id - delete, owner only; echoes the deleted record
pub async fn remove<K: ResourceKind>(
    user: CurrentUser,
    Path((store_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<K::Row>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    authorize_store_owner(&pool, &user.user_id, store_id).await?;

    let row = ResourceService::<K>::remove(&pool, store_id, id).await?;
    Ok(Json(row))
}
