use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::marker::PhantomData;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the resource layer, mapped to HTTP by `ApiError`
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn required(field: impl Into<String>, display: &str) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: format!("{} is required", display),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Map a foreign-key violation (Postgres 23503) to a conflict; everything
/// else stays a database error.
pub(crate) fn map_constraint(err: sqlx::Error, display: &str) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23503") {
            return ServiceError::Conflict(format!(
                "{} is still referenced by other resources; remove dependent resources first",
                display
            ));
        }
    }
    ServiceError::Database(err)
}

/// Verify a referenced row exists in the same store. Postgres foreign keys
/// only check existence, not store membership, so cross-store references
/// must be caught here before insert/update.
pub(crate) async fn assert_same_store(
    pool: &PgPool,
    table: &str,
    display: &str,
    id: Uuid,
    store_id: Uuid,
) -> Result<(), ServiceError> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND store_id = $2)",
        table
    );
    let (exists,): (bool,) = sqlx::query_as(&sql).bind(id).bind(store_id).fetch_one(pool).await?;

    if exists {
        Ok(())
    } else {
        Err(ServiceError::Conflict(format!(
            "{} does not belong to this store",
            display
        )))
    }
}

/// Shared SQL for row-shaped kinds, keyed by table name. The double-keyed
/// `(id, store_id)` predicates here are the tenant-isolation mechanism: a
/// mutation naming another store's row matches zero rows.
pub struct Repository<T> {
    table: &'static str,
    display: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin,
{
    pub fn new(table: &'static str, display: &'static str) -> Self {
        Self {
            table,
            display,
            _phantom: PhantomData,
        }
    }

    pub async fn fetch(&self, pool: &PgPool, id: Uuid) -> Result<Option<T>, ServiceError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.table);
        Ok(sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn list_for_store(&self, pool: &PgPool, store_id: Uuid) -> Result<Vec<T>, ServiceError> {
        let sql = format!(
            "SELECT * FROM {} WHERE store_id = $1 ORDER BY created_at DESC",
            self.table
        );
        Ok(sqlx::query_as::<_, T>(&sql).bind(store_id).fetch_all(pool).await?)
    }

    pub async fn delete_scoped(&self, pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<T>, ServiceError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND store_id = $2 RETURNING *",
            self.table
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_constraint(e, self.display))
    }
}

/// Per-kind descriptor: table, path slug, payload and row shapes, validation,
/// and the SQL hooks. The simple kinds delegate to `Repository`; Product
/// overrides everything that touches its image set.
#[async_trait]
pub trait ResourceKind: Send + Sync + 'static {
    const TABLE: &'static str;
    const SLUG: &'static str;
    const DISPLAY: &'static str;

    type Payload: DeserializeOwned + Send + 'static;
    type Row: Serialize + Send + 'static;

    /// Field-schema validation; missing/empty required field fails with the
    /// offending field named.
    fn validate(payload: &Self::Payload) -> Result<(), ServiceError>;

    /// Same-store pre-check for kinds with foreign keys; default is no-op.
    async fn check_references(
        _pool: &PgPool,
        _store_id: Uuid,
        _payload: &Self::Payload,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError>;

    /// Must match both id and store_id; zero rows means NotFound.
    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<Self::Row, ServiceError>;

    async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Self::Row>, ServiceError>;

    async fn list(
        pool: &PgPool,
        store_id: Uuid,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Self::Row>, ServiceError>;

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self::Row>, ServiceError>;
}

/// Policy layer over a `ResourceKind`: validation and reference checks run
/// before any persistence mutation, and absent rows surface as NotFound.
/// Callers are expected to have run the ownership guard first for mutations.
pub struct ResourceService<K: ResourceKind> {
    _kind: PhantomData<K>,
}

impl<K: ResourceKind> ResourceService<K> {
    pub async fn create(pool: &PgPool, store_id: Uuid, payload: K::Payload) -> Result<K::Row, ServiceError> {
        K::validate(&payload)?;
        K::check_references(pool, store_id, &payload).await?;
        K::insert(pool, store_id, &payload).await
    }

    pub async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        payload: K::Payload,
    ) -> Result<K::Row, ServiceError> {
        K::validate(&payload)?;
        K::check_references(pool, store_id, &payload).await?;
        K::update(pool, store_id, id, &payload).await
    }

    pub async fn remove(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<K::Row, ServiceError> {
        K::delete(pool, store_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} not found", K::DISPLAY)))
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<K::Row>, ServiceError> {
        K::fetch(pool, id).await
    }

    pub async fn list(
        pool: &PgPool,
        store_id: Uuid,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<K::Row>, ServiceError> {
        K::list(pool, store_id, filters).await
    }
}

/// Require a non-empty string field
pub(crate) fn require_str<'a>(
    value: &'a Option<String>,
    field: &str,
    display: &str,
) -> Result<&'a str, ServiceError> {
    match value.as_deref() {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ServiceError::required(field, display)),
    }
}

/// Require a present id field
pub(crate) fn require_id(value: &Option<Uuid>, field: &str, display: &str) -> Result<Uuid, ServiceError> {
    value.ok_or_else(|| ServiceError::required(field, display))
}
