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

#[tokio::test]
async fn supplier_resource_is_admin_only_including_reads() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let user = db.seed_user("USER").await.unwrap();

    let resp = client
        .get(format!("{}/api/supplier", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!("{}/api/supplier", server.base_url))
        .header("Authorization", &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn supplier_lifecycle() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let name = format!("test-sup-{}", unique());

    let resp = client
        .post(format!("{}/api/supplier", server.base_url))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": name, "phone": "021-555-0100", "address": "Warehouse 4" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    let supplier_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["name"], name.as_str());

    let resp = client
        .patch(format!("{}/api/supplier/{}", server.base_url, supplier_id))
        .header("Authorization", &admin.token)
        .json(&json!({ "phone": "021-555-0101" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["phone"], "021-555-0101");
    assert_eq!(body["data"]["name"], name.as_str());

    let resp = client
        .get(format!(
            "{}/api/supplier/{}/products",
            server.base_url, supplier_id
        ))
        .header("Authorization", &admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 0);

    let resp = client
        .delete(format!("{}/api/supplier/{}", server.base_url, supplier_id))
        .header("Authorization", &admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/api/supplier/{}", server.base_url, supplier_id))
        .header("Authorization", &admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn shipper_reads_are_public_and_writes_admin_only() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let user = db.seed_user("USER").await.unwrap();
    let shipper_id = db
        .seed_shipper(&format!("test-ship-{}", unique()))
        .await
        .unwrap();

    // Anonymous read works
    let resp = client
        .get(format!("{}/api/shippers/{}", server.base_url, shipper_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Writes do not
    let resp = client
        .patch(format!("{}/api/shippers/{}", server.base_url, shipper_id))
        .header("Authorization", &user.token)
        .json(&json!({ "phone": "021-555" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = client
        .patch(format!("{}/api/shippers/{}", server.base_url, shipper_id))
        .header("Authorization", &admin.token)
        .json(&json!({ "phone": "021-556" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn shipper_names_are_unique() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let name = format!("test-ship-{}", unique());
    db.seed_shipper(&name).await.unwrap();

    let resp = client
        .post(format!("{}/api/shippers", server.base_url))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": name, "phone": "021-555" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn shipper_orders_view_requires_admin() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let shipper_id = db
        .seed_shipper(&format!("test-ship-{}", unique()))
        .await
        .unwrap();

    let resp = client
        .get(format!(
            "{}/api/shippers/{}/orders",
            server.base_url, shipper_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!(
            "{}/api/shippers/{}/orders",
            server.base_url, shipper_id
        ))
        .header("Authorization", &admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 0);
}
