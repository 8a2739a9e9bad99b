mod common;

use common::{database_configured, ensure_server, unique, TestDb};
use serde_json::json;

macro_rules! require_database {
    () => {
        if !database_configured() {
            eprintln!("skipping: DATABASE_URL not set");
            return;
        }
    };
}

struct OrderFixture {
    shipper_id: i32,
    product_id: i32,
}

async fn seed_order_fixture(db: &TestDb, stock: i32) -> OrderFixture {
    let marker = unique();
    let category_id = db
        .seed_category(&format!("test-cat-{}", marker))
        .await
        .unwrap();
    let supplier_id = db
        .seed_supplier(&format!("test-sup-{}", marker))
        .await
        .unwrap();
    let shipper_id = db
        .seed_shipper(&format!("test-ship-{}", marker))
        .await
        .unwrap();
    let product_id = db
        .seed_product(
            &format!("O{}", &marker[..8]),
            &format!("test-prod-{}", marker),
            stock,
            category_id,
            supplier_id,
        )
        .await
        .unwrap();

    OrderFixture {
        shipper_id,
        product_id,
    }
}

fn order_payload(shipper_id: i32, product_id: i32, quantity: i32) -> serde_json::Value {
    json!({
        "shippingPrice": 15.0,
        "shipperId": shipper_id,
        "orderDate": "2024-01-01T00:00:00Z",
        "requiredDate": "2030-01-08T00:00:00Z",
        "orderDetail": [
            { "productId": product_id, "quantityOrdered": quantity, "priceEach": 9.99 }
        ]
    })
}

#[tokio::test]
async fn order_requires_authentication() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .json(&order_payload(1, 1, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn order_create_fails_on_missing_shipper() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let fixture = seed_order_fixture(&db, 10).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(999999999, fixture.product_id, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["errors"], "Shipper not found");
    assert_eq!(db.count_orders_for(&user.username).await.unwrap(), 0);
}

#[tokio::test]
async fn order_create_fails_on_missing_product() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let fixture = seed_order_fixture(&db, 10).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(fixture.shipper_id, 999999999, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["errors"], "Product 999999999 not found");
    assert_eq!(db.count_orders_for(&user.username).await.unwrap(), 0);
}

#[tokio::test]
async fn order_create_fails_on_insufficient_stock_without_persisting() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let fixture = seed_order_fixture(&db, 3).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(fixture.shipper_id, fixture.product_id, 5))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["errors"],
        format!("Product {} not enough in stock", fixture.product_id)
    );
    assert_eq!(db.count_orders_for(&user.username).await.unwrap(), 0);
}

#[tokio::test]
async fn order_create_and_fetch_round_trip() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let other = db.seed_user("USER").await.unwrap();
    let fixture = seed_order_fixture(&db, 10).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(fixture.shipper_id, fixture.product_id, 2))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["username"], user.username.as_str());
    assert_eq!(body["data"]["status"], "In Process");
    let lines = body["data"]["orderDetail"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productId"], fixture.product_id);
    assert_eq!(lines[0]["quantityOrdered"], 2);
    let order_id = body["data"]["id"].as_i64().unwrap();

    // Owner sees it
    let resp = client
        .get(format!("{}/api/orders/{}", server.base_url, order_id))
        .header("Authorization", &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // A different user gets a plain 404, not a 403 that would leak existence
    let resp = client
        .get(format!("{}/api/orders/{}", server.base_url, order_id))
        .header("Authorization", &other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Owner list contains it
    let resp = client
        .get(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"].as_i64() == Some(order_id)));
    assert!(body["paging"]["total_page"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn order_owner_can_update_comment_only() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let fixture = seed_order_fixture(&db, 10).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(fixture.shipper_id, fixture.product_id, 1))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let order_id = body["data"]["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{}/api/orders/{}", server.base_url, order_id))
        .header("Authorization", &user.token)
        .json(&json!({ "comment": "leave at the door" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["comment"], "leave at the door");
    // Status is untouched by the owner path
    assert_eq!(body["data"]["status"], "In Process");
}

#[tokio::test]
async fn order_shipping_update_is_admin_only() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();
    let admin = db.seed_user("ADMIN").await.unwrap();
    let fixture = seed_order_fixture(&db, 10).await;

    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&order_payload(fixture.shipper_id, fixture.product_id, 1))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let order_id = body["data"]["id"].as_i64().unwrap();

    let shipping = json!({ "status": "Shipped", "shippedDate": "2030-01-02T00:00:00Z" });

    let resp = client
        .patch(format!(
            "{}/api/orders/{}/shipping",
            server.base_url, order_id
        ))
        .header("Authorization", &user.token)
        .json(&shipping)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = client
        .patch(format!(
            "{}/api/orders/{}/shipping",
            server.base_url, order_id
        ))
        .header("Authorization", &admin.token)
        .json(&shipping)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Shipped");
    assert!(body["data"]["shippedDate"].is_string());
}

#[tokio::test]
async fn order_create_rejects_invalid_payload_before_touching_the_store() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();

    // Empty line list and a future order date
    let resp = client
        .post(format!("{}/api/orders", server.base_url))
        .header("Authorization", &user.token)
        .json(&json!({
            "shippingPrice": 15.0,
            "shipperId": 1,
            "orderDate": "2099-01-01T00:00:00Z",
            "requiredDate": "2099-01-08T00:00:00Z",
            "orderDetail": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["errors"].get("order_detail").is_some());
    assert!(body["errors"].get("order_date").is_some());
    assert_eq!(db.count_orders_for(&user.username).await.unwrap(), 0);
}
