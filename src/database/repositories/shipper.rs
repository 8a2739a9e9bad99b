use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Order, Shipper};

pub struct ShipperRepository {
    pool: PgPool,
}

impl ShipperRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Shipper>, DatabaseError> {
        let shipper = sqlx::query_as::<_, Shipper>("SELECT * FROM shippers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(shipper)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Shipper>, DatabaseError> {
        let shipper = sqlx::query_as::<_, Shipper>("SELECT * FROM shippers WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(shipper)
    }

    pub async fn find_all(&self) -> Result<Vec<Shipper>, DatabaseError> {
        let shippers = sqlx::query_as::<_, Shipper>("SELECT * FROM shippers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(shippers)
    }

    pub async fn create(&self, name: &str, phone: &str) -> Result<Shipper, DatabaseError> {
        let shipper = sqlx::query_as::<_, Shipper>(
            "INSERT INTO shippers (name, phone) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(shipper)
    }

    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Shipper, DatabaseError> {
        let shipper = sqlx::query_as::<_, Shipper>(
            "UPDATE shippers SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(shipper)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM shippers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Eager load of the shipper's orders
    pub async fn orders_of(&self, shipper_id: i32) -> Result<Vec<Order>, DatabaseError> {
        let orders =
            sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE shipper_id = $1 ORDER BY id")
                .bind(shipper_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(orders)
    }
}
