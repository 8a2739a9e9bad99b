use axum::{middleware as axum_middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use store_api_rust::database::manager::DatabaseManager;
use store_api_rust::middleware::auth::resolve_principal;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = store_api_rust::config::config();
    tracing::info!("Starting Store API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("STORE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Store API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Resources
        .merge(user_routes())
        .merge(category_routes())
        .merge(product_routes())
        .merge(supplier_routes())
        .merge(shipper_routes())
        .merge(order_routes())
        // Resolve the bearer token to a principal once per request
        .layer(axum_middleware::from_fn(resolve_principal));

    let router = if store_api_rust::config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router {
    use axum::routing::{patch, post};
    use store_api_rust::handlers::user;

    Router::new()
        .route("/api/user/register", post(user::register))
        .route("/api/user/login", post(user::login))
        .route(
            "/api/user/current",
            get(user::current)
                .patch(user::update_profile)
                .delete(user::logout),
        )
        .route("/api/user/current/password", patch(user::update_password))
}

fn category_routes() -> Router {
    use axum::routing::post;
    use store_api_rust::handlers::category;

    Router::new()
        .route("/api/category", post(category::create).get(category::list))
        .route(
            "/api/category/:categoryId",
            get(category::get)
                .patch(category::update)
                .delete(category::remove),
        )
        .route("/api/category/:categoryId/products", get(category::products))
}

fn product_routes() -> Router {
    use axum::routing::{patch, post};
    use store_api_rust::handlers::product;

    Router::new()
        .route("/api/products", post(product::create).get(product::list))
        .route("/api/products/search", get(product::search))
        .route(
            "/api/products/:productId",
            get(product::get)
                .patch(product::update)
                .delete(product::remove),
        )
        .route("/api/products/:productId/stock", patch(product::update_stock))
}

fn supplier_routes() -> Router {
    use axum::routing::post;
    use store_api_rust::handlers::supplier;

    Router::new()
        .route("/api/supplier", post(supplier::create).get(supplier::list))
        .route(
            "/api/supplier/:supplierId",
            get(supplier::get)
                .patch(supplier::update)
                .delete(supplier::remove),
        )
        .route("/api/supplier/:supplierId/products", get(supplier::products))
}

fn shipper_routes() -> Router {
    use axum::routing::post;
    use store_api_rust::handlers::shipper;

    Router::new()
        .route("/api/shippers", post(shipper::create).get(shipper::list))
        .route(
            "/api/shippers/:shipperId",
            get(shipper::get)
                .patch(shipper::update)
                .delete(shipper::remove),
        )
        .route("/api/shippers/:shipperId/orders", get(shipper::orders))
}

fn order_routes() -> Router {
    use axum::routing::{patch, post};
    use store_api_rust::handlers::order;

    Router::new()
        .route("/api/orders", post(order::create).get(order::list))
        .route("/api/orders/:orderId", get(order::get).patch(order::update))
        .route("/api/orders/:orderId/shipping", patch(order::update_shipping))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "data": {
            "name": "Store API (Rust)",
            "version": version,
            "description": "Store management REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "user": "/api/user/register, /api/user/login (public), /api/user/current (authenticated)",
                "category": "/api/category[/:id] (read public, write admin)",
                "products": "/api/products[/:id], /api/products/search (read public, write admin)",
                "supplier": "/api/supplier[/:id] (admin)",
                "shippers": "/api/shippers[/:id] (read public, write admin)",
                "orders": "/api/orders[/:id] (authenticated)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "errors": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
