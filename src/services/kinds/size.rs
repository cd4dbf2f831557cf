use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::Size;
use crate::services::resource::{require_str, Repository, ResourceKind, ServiceError};

pub struct Sizes;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePayload {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Sizes {
    fn repo() -> Repository<Size> {
        Repository::new(Self::TABLE, Self::DISPLAY)
    }
}

#[async_trait]
impl ResourceKind for Sizes {
    const TABLE: &'static str = "sizes";
    const SLUG: &'static str = "sizes";
    const DISPLAY: &'static str = "Size";

    type Payload = SizePayload;
    type Row = Size;

    fn validate(payload: &Self::Payload) -> Result<(), ServiceError> {
        require_str(&payload.name, "name", "Name")?;
        require_str(&payload.value, "value", "Value")?;
        Ok(())
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError> {
        let row = sqlx::query_as::<_, Size>(
            "INSERT INTO sizes (store_id, name, value) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.value.as_deref().unwrap_or_default())
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<Self::Row, ServiceError> {
        sqlx::query_as::<_, Size>(
            "UPDATE sizes SET name = $1, value = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.value.as_deref().unwrap_or_default())
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Size not found".to_string()))
    }

    async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Self::Row>, ServiceError> {
        Self::repo().fetch(pool, id).await
    }

    async fn list(
        pool: &PgPool,
        store_id: Uuid,
        _filters: &HashMap<String, String>,
    ) -> Result<Vec<Self::Row>, ServiceError> {
        Self::repo().list_for_store(pool, store_id).await
    }

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self::Row>, ServiceError> {
        Self::repo().delete_scoped(pool, store_id, id).await
    }
}
