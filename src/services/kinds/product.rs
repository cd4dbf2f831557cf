use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Product, ProductImage, ProductWithImages};
use crate::services::resource::{
    assert_same_store, map_constraint, require_id, require_str, ResourceKind, ServiceError,
};

pub struct Products;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub images: Option<Vec<ImagePayload>>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}

/// Batch-load image sets for a slice of products, oldest first
async fn load_images(
    pool: &PgPool,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<ProductImage>>, ServiceError> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = ANY($1) ORDER BY created_at",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut by_product: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        by_product.entry(row.product_id).or_default().push(row);
    }
    Ok(by_product)
}

#[async_trait]
impl ResourceKind for Products {
    const TABLE: &'static str = "products";
    const SLUG: &'static str = "products";
    const DISPLAY: &'static str = "Product";

    type Payload = ProductPayload;
    type Row = ProductWithImages;

    fn validate(payload: &Self::Payload) -> Result<(), ServiceError> {
        require_str(&payload.name, "name", "Name")?;

        let price = payload
            .price
            .ok_or_else(|| ServiceError::required("price", "Price"))?;
        if price <= Decimal::ZERO {
            return Err(ServiceError::invalid("price", "Price must be positive"));
        }

        require_id(&payload.category_id, "categoryId", "Category ID")?;
        require_id(&payload.size_id, "sizeId", "Size ID")?;
        require_id(&payload.color_id, "colorId", "Color ID")?;

        match payload.images.as_deref() {
            Some(images) if !images.is_empty() => Ok(()),
            _ => Err(ServiceError::required("images", "Images")),
        }
    }

    async fn check_references(
        pool: &PgPool,
        store_id: Uuid,
        payload: &Self::Payload,
    ) -> Result<(), ServiceError> {
        let category_id = require_id(&payload.category_id, "categoryId", "Category ID")?;
        let size_id = require_id(&payload.size_id, "sizeId", "Size ID")?;
        let color_id = require_id(&payload.color_id, "colorId", "Color ID")?;

        assert_same_store(pool, "categories", "Category", category_id, store_id).await?;
        assert_same_store(pool, "sizes", "Size", size_id, store_id).await?;
        assert_same_store(pool, "colors", "Color", color_id, store_id).await?;
        Ok(())
    }

    async fn insert(pool: &PgPool, store_id: Uuid, payload: &Self::Payload) -> Result<Self::Row, ServiceError> {
        let mut tx = pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
             (store_id, name, price, category_id, size_id, color_id, is_featured, is_archived) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(store_id)
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.price.unwrap_or_default())
        .bind(payload.category_id.unwrap_or_default())
        .bind(payload.size_id.unwrap_or_default())
        .bind(payload.color_id.unwrap_or_default())
        .bind(payload.is_featured.unwrap_or(false))
        .bind(payload.is_archived.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::new();
        for image in payload.images.as_deref().unwrap_or_default() {
            let row = sqlx::query_as::<_, ProductImage>(
                "INSERT INTO product_images (product_id, url) VALUES ($1, $2) RETURNING *",
            )
            .bind(product.id)
            .bind(&image.url)
            .fetch_one(&mut *tx)
            .await?;
            images.push(row);
        }

        tx.commit().await?;
        Ok(ProductWithImages { product, images })
    }

    /// Full-field replacement including the image set. Scalar update, image
    /// delete, and image insert commit together; a failure anywhere leaves
    /// the prior image set intact.
    async fn update(
        pool: &PgPool,
        store_id: Uuid,
        id: Uuid,
        payload: &Self::Payload,
    ) -> Result<Self::Row, ServiceError> {
        let mut tx = pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET name = $1, price = $2, category_id = $3, size_id = $4, \
             color_id = $5, is_featured = $6, is_archived = $7, updated_at = now() \
             WHERE id = $8 AND store_id = $9 RETURNING *",
        )
        .bind(payload.name.as_deref().unwrap_or_default())
        .bind(payload.price.unwrap_or_default())
        .bind(payload.category_id.unwrap_or_default())
        .bind(payload.size_id.unwrap_or_default())
        .bind(payload.color_id.unwrap_or_default())
        .bind(payload.is_featured.unwrap_or(false))
        .bind(payload.is_archived.unwrap_or(false))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))?;

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        let mut images = Vec::new();
        for image in payload.images.as_deref().unwrap_or_default() {
            let row = sqlx::query_as::<_, ProductImage>(
                "INSERT INTO product_images (product_id, url) VALUES ($1, $2) RETURNING *",
            )
            .bind(product.id)
            .bind(&image.url)
            .fetch_one(&mut *tx)
            .await?;
            images.push(row);
        }

        tx.commit().await?;
        Ok(ProductWithImages { product, images })
    }

    async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Self::Row>, ServiceError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let mut by_product = load_images(pool, &[product.id]).await?;
        let images = by_product.remove(&product.id).unwrap_or_default();
        Ok(Some(ProductWithImages { product, images }))
    }

    /// Storefront listing: archived products are never returned, newest
    /// first. Unset filters are omitted from the match entirely.
    async fn list(
        pool: &PgPool,
        store_id: Uuid,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Self::Row>, ServiceError> {
        let mut sql =
            String::from("SELECT * FROM products WHERE store_id = $1 AND is_archived = FALSE");
        let mut id_binds: Vec<Uuid> = Vec::new();

        for (param, column) in [
            ("categoryId", "category_id"),
            ("sizeId", "size_id"),
            ("colorId", "color_id"),
        ] {
            if let Some(raw) = filters.get(param) {
                let id = Uuid::parse_str(raw)
                    .map_err(|_| ServiceError::invalid(param, format!("{} must be a valid id", param)))?;
                id_binds.push(id);
                sql.push_str(&format!(" AND {} = ${}", column, id_binds.len() + 1));
            }
        }

        // Matches the storefront contract: only the literal "true" filters
        if filters.get("isFeatured").map(String::as_str) == Some("true") {
            sql.push_str(" AND is_featured = TRUE");
        }

        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Product>(&sql).bind(store_id);
        for id in &id_binds {
            query = query.bind(*id);
        }
        let products = query.fetch_all(pool).await?;

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let mut by_product = load_images(pool, &ids).await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let images = by_product.remove(&product.id).unwrap_or_default();
                ProductWithImages { product, images }
            })
            .collect())
    }

    async fn delete(pool: &PgPool, store_id: Uuid, id: Uuid) -> Result<Option<Self::Row>, ServiceError> {
        // Read the image set first so the deleted-record echo is complete;
        // the cascade removes the rows with the product.
        let mut by_product = load_images(pool, &[id]).await?;

        let product = sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = $1 AND store_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_constraint(e, Self::DISPLAY))?;

        Ok(product.map(|product| {
            let images = by_product.remove(&product.id).unwrap_or_default();
            ProductWithImages { product, images }
        }))
    }
}
