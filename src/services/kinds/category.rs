use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::Category;
use crate::services::resource::{
    assert_same_store, require_id, require_str, Repository, ResourceKind, ServiceError,
};

pub struct Categories;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub billboard_id: Option<Uuid>,
}

impl Categories {
    fn repo() -> Repository<Category> {
        Repository::new(Self::TABLE, Self::DISPLAY)
    }
}

#[async_trait]
impl ResourceKind for Categories {
    const TABLE: &'static str = "categories";
    const SLUG: &'static str = "categories";
    const DISPLAY: &'static str = "Category";

    type Payload = CategoryPayload;
    type Row = Category;

    fn validate(payload: &Self::Payload) -> Result<(), ServiceError> {
        require_str(&payload.name, "name", "Name")?;
        require_id(&payload.billboard_id, "billboardId", "Billboard ID")?;
        Ok(())
    }

    async fn check_references(
        pool: &PgPool,
        store_id: Uuid,
        payload: &Self::Payload,
    ) -> Result<(), ServiceError> {
        let billboard_id = require_id(&payload.billboard_id, "billboardId", "Billboard ID")?;
        assert_same_store(pool, "billboards", "Billboard", billboard_id, store_id).await
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (store_id, name, billboard_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(store_id)
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.billboard_id.unwrap_or_default())
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
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, billboard_id = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.billboard_id.unwrap_or_default())
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))
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
