use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Store;

/// Outcome of the ownership check that precedes every mutating call
#[derive(Debug, Error)]
pub enum GuardError {
    /// No session, or the token did not resolve to a user
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Identity is known but is not the store owner - distinct from
    /// Unauthenticated on purpose
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store {0} not found")]
    StoreNotFound(Uuid),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Verify the authenticated user owns the store named in the request path.
/// Pure read + comparison; must run before any persistence mutation, never
/// after. Returns the store record for use by the resource layer.
pub async fn authorize_store_owner(
    pool: &PgPool,
    user_id: &str,
    store_id: Uuid,
) -> Result<Store, GuardError> {
    if user_id.trim().is_empty() {
        return Err(GuardError::Unauthenticated);
    }

    let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
        .bind(store_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GuardError::StoreNotFound(store_id))?;

    if store.user_id != user_id {
        tracing::warn!(
            store_id = %store_id,
            "Ownership check rejected request from non-owner"
        );
        return Err(GuardError::Unauthorized);
    }

    Ok(store)
}
