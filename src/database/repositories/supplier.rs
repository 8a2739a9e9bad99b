use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Product, Supplier};

pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Supplier>, DatabaseError> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supplier)
    }

    pub async fn find_all(&self) -> Result<Vec<Supplier>, DatabaseError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn create(
        &self,
        name: &str,
        phone: &str,
        address: Option<&str>,
    ) -> Result<Supplier, DatabaseError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (name, phone, address) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(phone)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Supplier, DatabaseError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "UPDATE suppliers SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                address = COALESCE($4, address) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Eager load of the supplier's products
    pub async fn products_of(&self, supplier_id: i32) -> Result<Vec<Product>, DatabaseError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE supplier_id = $1 ORDER BY id")
                .bind(supplier_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }
}
