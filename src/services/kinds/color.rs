use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::Color;
use crate::services::resource::{require_str, Repository, ResourceKind, ServiceError};

pub struct Colors;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Colors {
    fn repo() -> Repository<Color> {
        Repository::new(Self::TABLE, Self::DISPLAY)
    }
}

/// Accepts "#abc" and "#aabbcc" forms, case-insensitive
fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait]
impl ResourceKind for Colors {
    const TABLE: &'static str = "colors";
    const SLUG: &'static str = "colors";
    const DISPLAY: &'static str = "Color";

    type Payload = ColorPayload;
    type Row = Color;

    fn validate(payload: &Self::Payload) -> Result<(), ServiceError> {
        require_str(&payload.name, "name", "Name")?;
        let value = require_str(&payload.value, "value", "Value")?;
        if !is_hex_color(value) {
            return Err(ServiceError::invalid(
                "value",
                "Value must be a hex color, e.g. #fff or #1a2b3c",
            ));
        }
        Ok(())
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError> {
        let row = sqlx::query_as::<_, Color>(
            "INSERT INTO colors (store_id, name, value) VALUES ($1, $2, $3) RETURNING *",
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
        sqlx::query_as::<_, Color>(
            "UPDATE colors SET name = $1, value = $2, updated_at = now() \
             WHERE id = $3 AND store_id = $4 RETURNING *",
        )
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.value.as_deref().unwrap_or_default())
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Color not found".to_string()))
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
