#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a reachable Postgres; without one they skip
/// instead of failing, so the suite stays runnable in bare environments.
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").is_ok()
}

/// Short unique suffix so concurrently running tests never share rows.
pub fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the binary before integration tests run
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_store-api-rust"));
        cmd.env("STORE_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

#[derive(Debug, Clone)]
pub struct SeededUser {
    pub username: String,
    pub token: String,
    pub password: String,
}

/// Direct database access for seeding and assertions, bypassing the API the
/// same way the original test suite talked straight to the ORM.
pub struct TestDb {
    pub pool: PgPool,
}

impl TestDb {
    pub async fn connect() -> Result<Self> {
        static SCHEMA: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

        let url = std::env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await?;

        // Apply the (idempotent) schema once per test binary; concurrent
        // CREATE TABLE IF NOT EXISTS statements can race inside Postgres.
        SCHEMA
            .get_or_try_init(|| async {
                sqlx::raw_sql(include_str!("../../schema.sql"))
                    .execute(&pool)
                    .await
                    .map(|_| ())
            })
            .await?;

        Ok(Self { pool })
    }

    pub async fn seed_user(&self, role: &str) -> Result<SeededUser> {
        let suffix = unique();
        let username = format!("test-{}", suffix);
        let token = format!("token-{}", Uuid::new_v4().simple());
        let password = "Test123!pass".to_string();
        let hash = store_api_rust::auth::hash_password(&password)
            .map_err(|e| anyhow::anyhow!("hash failed: {}", e))?;

        sqlx::query(
            "INSERT INTO users (username, password, name, email, phone, token, role) \
             VALUES ($1, $2, 'test', $3, '0812345678', $4, $5)",
        )
        .bind(&username)
        .bind(&hash)
        .bind(format!("{}@example.com", username))
        .bind(&token)
        .bind(role)
        .execute(&self.pool)
        .await?;

        Ok(SeededUser {
            username,
            token,
            password,
        })
    }

    pub async fn seed_category(&self, name: &str) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO categories (name, description) VALUES ($1, 'seeded') RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn seed_supplier(&self, name: &str) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO suppliers (name, phone) VALUES ($1, '021555') RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn seed_shipper(&self, name: &str) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO shippers (name, phone) VALUES ($1, '021555') RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn seed_product(
        &self,
        code: &str,
        name: &str,
        stock: i32,
        category_id: i32,
        supplier_id: i32,
    ) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO products \
                (code, name, price, description, quantity_in_stock, category_id, supplier_id) \
             VALUES ($1, $2, $3, 'seeded product', $4, $5, $6) \
             RETURNING id",
        )
        .bind(code)
        .bind(name)
        .bind(Decimal::new(1999, 2))
        .bind(stock)
        .bind(category_id)
        .bind(supplier_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn count_orders_for(&self, username: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn stored_password_of(&self, username: &str) -> Result<String> {
        let hash: String = sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(hash)
    }
}
