mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn billboard_crud_under_store() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_bb").await?;
    let store_id = common::create_store(server, &token, "Billboard Store").await?;

    let billboard_id = common::create_billboard(server, &token, &store_id, "Hero").await?;

    // Public detail
    let res = client
        .get(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_id, billboard_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["label"], "Hero");

    // Public list
    let res = client
        .get(format!("{}/api/{}/billboards", server.base_url, store_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Update
    let res = client
        .patch(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_id, billboard_id
        ))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "label": "Hero v2",
            "imageUrl": "https://cdn.example.com/v2.png"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["label"], "Hero v2");

    // Validation failure names the field
    let res = client
        .post(format!("{}/api/{}/billboards", server.base_url, store_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "label": "", "imageUrl": "https://x/y.png" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["field"], "label");

    // Delete echoes the record
    let res = client
        .delete(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_id, billboard_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn update_scoped_to_foreign_store_is_not_found() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_scope").await?;

    // Two stores with the same owner; a valid resource id under the wrong
    // store path must match zero rows, not leak across stores
    let store_a = common::create_store(server, &token, "Scope A").await?;
    let store_b = common::create_store(server, &token, "Scope B").await?;
    let billboard_in_a = common::create_billboard(server, &token, &store_a, "A only").await?;

    let res = client
        .patch(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_b, billboard_in_a
        ))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "label": "Stolen",
            "imageUrl": "https://cdn.example.com/x.png"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The row in store A is untouched
    let res = client
        .get(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_a, billboard_in_a
        ))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["label"], "A only");

    // Delete through the wrong store path also affects zero rows
    let res = client
        .delete(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_b, billboard_in_a
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn deleting_referenced_billboard_conflicts() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_fk").await?;
    let store_id = common::create_store(server, &token, "FK Store").await?;
    let billboard_id = common::create_billboard(server, &token, &store_id, "Referenced").await?;

    let res = client
        .post(format!("{}/api/{}/categories", server.base_url, store_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Shirts", "billboardId": billboard_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Referenced billboard cannot be deleted
    let res = client
        .delete(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_id, billboard_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "CONFLICT");

    // And remains queryable afterwards
    let res = client
        .get(format!(
            "{}/api/{}/billboards/{}",
            server.base_url, store_id, billboard_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["id"], billboard_id.as_str());

    Ok(())
}

#[tokio::test]
async fn category_billboard_must_share_store() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_xstore").await?;

    let store_a = common::create_store(server, &token, "Cross A").await?;
    let store_b = common::create_store(server, &token, "Cross B").await?;
    let billboard_in_a = common::create_billboard(server, &token, &store_a, "A board").await?;

    let res = client
        .post(format!("{}/api/{}/categories", server.base_url, store_b))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "Sneaky", "billboardId": billboard_in_a }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn color_value_must_be_hex() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_color").await?;
    let store_id = common::create_store(server, &token, "Color Store").await?;

    let post_color = |value: &str| {
        client
            .post(format!("{}/api/{}/colors", server.base_url, store_id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "name": "Swatch", "value": value }))
            .send()
    };

    let res = post_color("zzz").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_color("#fff").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = post_color("#ffffff").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn missing_detail_echoes_null() -> Result<()> {
    if !common::database_available() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::mint_token(server, "user_null").await?;
    let store_id = common::create_store(server, &token, "Null Store").await?;

    let res = client
        .get(format!(
            "{}/api/{}/sizes/00000000-0000-0000-0000-000000000000",
            server.base_url, store_id
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.is_null());

    Ok(())
}
