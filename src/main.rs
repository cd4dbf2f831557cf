use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store_admin_api::database::DatabaseManager;
use store_admin_api::handlers::{self, resources};
use store_admin_api::services::kinds::{Billboards, Categories, Colors, Products, Sizes};
use store_admin_api::services::ResourceKind;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = store_admin_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting store admin API in {:?} mode", config.environment);

    // Best effort at boot; /health keeps reporting degraded until the
    // database is reachable
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("Skipping migrations, database not ready: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ADMIN_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Store admin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Identity provider stand-in (disabled in production config)
        .route("/auth/token", post(handlers::auth::mint_token))
        // Store collection
        .merge(store_routes())
        // Store-scoped resource collections
        .merge(resource_routes::<Billboards>())
        .merge(resource_routes::<Categories>())
        .merge(resource_routes::<Sizes>())
        .merge(resource_routes::<Colors>())
        .merge(resource_routes::<Products>())
        // Read-only order history
        .route("/api/:store_id/orders", get(handlers::orders::list))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn store_routes() -> Router {
    use axum::routing::patch;
    use store_admin_api::handlers::stores;

    Router::new()
        .route("/api/stores", post(stores::create))
        .route(
            "/api/stores/:store_id",
            patch(stores::update).delete(stores::remove),
        )
}

/// List + create on the collection, detail/update/delete on the member.
/// List and detail are public storefront reads; mutations authenticate and
/// run the ownership guard inside the handler.
fn resource_routes<K: ResourceKind>() -> Router {
    Router::new()
        .route(
            &format!("/api/:store_id/{}", K::SLUG),
            get(resources::list::<K>).post(resources::create::<K>),
        )
        .route(
            &format!("/api/:store_id/{}/:id", K::SLUG),
            get(resources::detail::<K>)
                .patch(resources::update::<K>)
                .delete(resources::remove::<K>),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Store Admin API",
        "version": version,
        "description": "Store-scoped e-commerce admin API",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "token": "/auth/token (development only)",
            "stores": "/api/stores[/:storeId] (authenticated owner)",
            "billboards": "/api/:storeId/billboards[/:id]",
            "categories": "/api/:storeId/categories[/:id]",
            "sizes": "/api/:storeId/sizes[/:id]",
            "colors": "/api/:storeId/colors[/:id]",
            "products": "/api/:storeId/products[/:id]",
            "orders": "/api/:storeId/orders (read-only)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
