use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::Billboard;
use crate::services::resource::{require_str, Repository, ResourceKind, ServiceError};

pub struct Billboards;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardPayload {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

impl Billboards {
    fn repo() -> Repository<Billboard> {
        Repository::new(Self::TABLE, Self::DISPLAY)
    }
}

#[async_trait]
impl ResourceKind for Billboards {
    const TABLE: &'static str = "billboards";
    const SLUG: &'static str = "billboards";
    const DISPLAY: &'static str = "Billboard";

    type Payload = BillboardPayload;
    type Row = Billboard;

    fn validate(payload: &Self::Payload) -> Result<(), ServiceError> {
        require_str(&payload.label, "label", "Label")?;
        require_str(&payload.image_url, "imageUrl", "Image URL")?;
        Ok(())
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError> {
        let row = sqlx::query_as::<_, Billboard>(
            "INSERT INTO billboards (store_id, label, image_url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(payload.label.as_deref().unwrap_or_default())
        .bind(payload.image_url.as_deref().unwrap_or_default())
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
        sqlx::query_as::<_, Billboard>(
            "UPDATE billboards SET label = $1, image_url = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(payload.label.as_deref().unwrap_or_default())
        .bind(payload.image_url.as_deref().unwrap_or_default())
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Billboard not found".to_string()))
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
