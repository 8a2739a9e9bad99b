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
async fn category_lifecycle_and_authorization() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let user = db.seed_user("USER").await.unwrap();
    let name = format!("Electronics-{}", unique());

    // Create as admin
    let resp = client
        .post(format!("{}/api/category", server.base_url))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], name.as_str());
    let category_id = body["data"]["id"].as_i64().unwrap();

    // Identical create conflicts, original row unaffected
    let resp = client
        .post(format!("{}/api/category", server.base_url))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Read is public
    let resp = client
        .get(format!("{}/api/category/{}", server.base_url, category_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], name.as_str());

    // Delete as authenticated non-admin is forbidden
    let resp = client
        .delete(format!("{}/api/category/{}", server.base_url, category_id))
        .header("Authorization", &user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Delete with no credential is unauthorized
    let resp = client
        .delete(format!("{}/api/category/{}", server.base_url, category_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Delete as admin answers with the pre-deletion snapshot
    let resp = client
        .delete(format!("{}/api/category/{}", server.base_url, category_id))
        .header("Authorization", &admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], name.as_str());

    let resp = client
        .get(format!("{}/api/category/{}", server.base_url, category_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn category_update_excludes_own_row_from_uniqueness() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let admin = db.seed_user("ADMIN").await.unwrap();
    let first = format!("test-cat-{}", unique());
    let second = format!("test-cat-{}", unique());
    let first_id = db.seed_category(&first).await.unwrap();
    db.seed_category(&second).await.unwrap();

    // Re-asserting the current name is not a self-conflict
    let resp = client
        .patch(format!("{}/api/category/{}", server.base_url, first_id))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": first }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Renaming onto another row's name is
    let resp = client
        .patch(format!("{}/api/category/{}", server.base_url, first_id))
        .header("Authorization", &admin.token)
        .json(&json!({ "name": second }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn category_with_products_nests_only_its_own() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let db = TestDb::connect().await.unwrap();
    let client = reqwest::Client::new();

    let marker = unique();
    let category_id = db
        .seed_category(&format!("test-cat-{}", marker))
        .await
        .unwrap();
    let other_id = db
        .seed_category(&format!("test-other-{}", marker))
        .await
        .unwrap();
    let supplier_id = db
        .seed_supplier(&format!("test-sup-{}", marker))
        .await
        .unwrap();

    db.seed_product(
        &format!("A{}", &marker[..8]),
        &format!("test-prod-a-{}", marker),
        5,
        category_id,
        supplier_id,
    )
    .await
    .unwrap();
    db.seed_product(
        &format!("B{}", &marker[..8]),
        &format!("test-prod-b-{}", marker),
        5,
        other_id,
        supplier_id,
    )
    .await
    .unwrap();

    let resp = client
        .get(format!(
            "{}/api/category/{}/products",
            server.base_url, category_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], format!("test-prod-a-{}", marker));
}

#[tokio::test]
async fn missing_category_is_404() {
    require_database!();
    let server = ensure_server().await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/category/999999999", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body.get("errors").is_some());
}
