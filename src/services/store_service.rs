use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Store;
use crate::services::resource::{map_constraint, ServiceError};

/// Store lifecycle. Create has no parent to guard; rename and delete are
/// invoked by handlers only after the ownership guard has passed.
pub struct StoreService;

impl StoreService {
    fn validate_name(name: Option<&str>) -> Result<&str, ServiceError> {
        match name {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(ServiceError::required("name", "Name")),
        }
    }

    pub async fn create(pool: &PgPool, user_id: &str, name: Option<&str>) -> Result<Store, ServiceError> {
        let name = Self::validate_name(name)?;

        let store = sqlx::query_as::<_, Store>(
            "INSERT INTO stores (name, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        tracing::info!(store_id = %store.id, "Created store");
        Ok(store)
    }

    pub async fn rename(pool: &PgPool, store_id: Uuid, name: Option<&str>) -> Result<Store, ServiceError> {
        let name = Self::validate_name(name)?;

        sqlx::query_as::<_, Store>(
            "UPDATE stores SET name = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(name)
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Store not found".to_string()))
    }

    /// Owned resources cascade with the store; rows still referenced from
    /// order history block the delete and surface as a conflict.
    pub async fn remove(pool: &PgPool, store_id: Uuid) -> Result<Store, ServiceError> {
        sqlx::query_as::<_, Store>("DELETE FROM stores WHERE id = $1 RETURNING *")
            .bind(store_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_constraint(e, "Store"))?
            .ok_or_else(|| ServiceError::NotFound("Store not found".to_string()))
    }
}
