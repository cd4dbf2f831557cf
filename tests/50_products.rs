mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;

struct Catalog {
    store_id: String,
    category_id: String,
    size_id: String,
    color_id: String,
}

/// Seed a store with one category/size/color so products can reference them
async fn seed_catalog(server: &common::TestServer, token: &str, name: &str) -> Result<Catalog> {
    let client = reqwest::Client::new();
    let store_id = common::create_store(server, token, name).await?;
    let billboard_id = common::create_billboard(server, token, &store_id, "Catalog").await?;

    let res = client
        .post(format!("{}/api/{}/categories", server.base_url, store_id))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": "Apparel", "billboardId": billboard_id }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "category create failed");
    let category_id = res.json::<serde_json::Value>().await?["id"]
        .as_str()
        .context("category id")?
        .to_string();

    let res = client
        .post(format!("{}/api/{}/sizes", server.base_url, store_id))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": "Medium", "value": "M" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "size create failed");
    let size_id = res.json::<serde_json::Value>().await?["id"]
        .as_str()
        .context("size id")?
        .to_string();

    let res = client
        .post(format!("{}/api/{}/colors", server.base_url, store_id))
        .bearer_auth(token)
        .json(&serde_json::json!({ "name": "Black", "value": "#000" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "color create failed");
    let color_id = res.json::<serde_json::Value>().await?["id"]
        .as_str()
        .context("color id")?
        .to_string();

    Ok(Catalog {
        store_id,
        category_id,
        size_id,
        color_id,
    })
}

fn product_body(catalog: &Catalog, name: &str, urls: &[&str], featured: bool, archived: bool) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "price": "49.99",
        "categoryId": catalog.category_id,
        "sizeId": catalog.size_id,
        "colorId": catalog.color_id,
        "images": urls.iter().map(|u| serde_json::json!({ "url": u })).collect::<Vec<_>>(),
        "isFeatured": featured,
        "isArchived": archived,
    })
}

#[tokio::test]
async fn product_create_and_image_replacement() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_prod").await?;
    let catalog = seed_catalog(server, &token, "Product Store").await?;

    let res = client
        .post(format!("{}/api/{}/products", server.base_url, catalog.store_id))
        .bearer_auth(&token)
        .json(&product_body(&catalog, "Tee", &["https://cdn/a.png", "https://cdn/b.png"], false, false))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let product_id = created["id"].as_str().context("product id")?.to_string();
    assert_eq!(created["images"].as_array().map(Vec::len), Some(2));

    // Full replacement: image set after update is exactly the new list
    let res = client
        .patch(format!(
            "{}/api/{}/products/{}",
            server.base_url, catalog.store_id, product_id
        ))
        .bearer_auth(&token)
        .json(&product_body(&catalog, "Tee v2", &["https://cdn/c.png"], false, false))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["name"], "Tee v2");
    let urls: Vec<&str> = updated["images"]
        .as_array()
        .context("images")?
        .iter()
        .filter_map(|i| i["url"].as_str())
        .collect();
    assert_eq!(urls, vec!["https://cdn/c.png"]);

    // Detail view agrees
    let res = client
        .get(format!(
            "{}/api/{}/products/{}",
            server.base_url, catalog.store_id, product_id
        ))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["images"].as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn product_requires_images() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_prod_noimg").await?;
    let catalog = seed_catalog(server, &token, "No Image Store").await?;

    let mut body = product_body(&catalog, "Ghost", &[], false, false);
    body["images"] = serde_json::json!([]);

    let res = client
        .post(format!("{}/api/{}/products", server.base_url, catalog.store_id))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["field"], "images");

    Ok(())
}

#[tokio::test]
async fn featured_listing_excludes_archived_and_orders_newest_first() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_prod_list").await?;
    let catalog = seed_catalog(server, &token, "Listing Store").await?;

    for (name, featured, archived) in [
        ("plain", false, false),
        ("featured-old", true, false),
        ("featured-archived", true, true),
        ("featured-new", true, false),
    ] {
        let res = client
            .post(format!("{}/api/{}/products", server.base_url, catalog.store_id))
            .bearer_auth(&token)
            .json(&product_body(&catalog, name, &["https://cdn/p.png"], featured, archived))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED, "create {} failed", name);
    }

    let res = client
        .get(format!(
            "{}/api/{}/products?isFeatured=true",
            server.base_url, catalog.store_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let names: Vec<&str> = body
        .as_array()
        .context("products")?
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();

    // Only non-archived featured products, newest first
    assert_eq!(names, vec!["featured-new", "featured-old"]);

    Ok(())
}

#[tokio::test]
async fn product_references_must_share_store() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_prod_cross").await?;

    let catalog_a = seed_catalog(server, &token, "Cross Prod A").await?;
    let catalog_b = seed_catalog(server, &token, "Cross Prod B").await?;

    // Category from store A inside store B's path
    let mut body = product_body(&catalog_b, "Confused", &["https://cdn/p.png"], false, false);
    body["categoryId"] = serde_json::json!(catalog_a.category_id);

    let res = client
        .post(format!("{}/api/{}/products", server.base_url, catalog_b.store_id))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}
