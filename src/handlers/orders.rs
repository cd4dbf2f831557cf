use axum::{extract::Path, Json};
use uuid::Uuid;

use crate::database::models::{Order, OrderItem, OrderWithItems};
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// GET /api/:store_id/orders - completed checkouts for a store, newest
/// first. Orders are read-only here; no mutation routes exist.
pub async fn list(Path(store_id): Path<Uuid>) -> Result<Json<Vec<OrderWithItems>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE store_id = $1 ORDER BY created_at DESC",
    )
    .bind(store_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Order listing failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = if order_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ANY($1)")
            .bind(&order_ids)
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Order item listing failed: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            })?
    };

    let mut by_order: std::collections::HashMap<Uuid, Vec<OrderItem>> = std::collections::HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(Json(
        orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect(),
    ))
}
