use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Order, OrderDetail, OrderStatus};
use crate::database::paging;

#[derive(Debug)]
pub struct NewOrder<'a> {
    pub shipper_id: i32,
    pub status: OrderStatus,
    pub shipping_price: Decimal,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub comment: Option<&'a str>,
}

#[derive(Debug)]
pub struct NewOrderLine {
    pub product_id: i32,
    pub quantity_ordered: i32,
    pub price_each: Decimal,
}

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DatabaseError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn details_of(&self, order_id: i32) -> Result<Vec<OrderDetail>, DatabaseError> {
        let details = sqlx::query_as::<_, OrderDetail>(
            "SELECT * FROM order_details WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(details)
    }

    pub async fn list_for_user(
        &self,
        username: &str,
        page: i64,
        size: i64,
    ) -> Result<Vec<Order>, DatabaseError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE username = $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(username)
        .bind(size)
        .bind(paging::offset(page, size))
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn count_for_user(&self, username: &str) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert the order and all of its lines in one transaction so a failure
    /// mid-way never leaves an orphaned order behind.
    pub async fn create_with_lines(
        &self,
        username: &str,
        order: &NewOrder<'_>,
        lines: &[NewOrderLine],
    ) -> Result<(Order, Vec<OrderDetail>), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Order>(
            "INSERT INTO orders \
                (username, shipper_id, status, shipping_price, order_date, required_date, \
                 shipped_date, comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(username)
        .bind(order.shipper_id)
        .bind(order.status.as_str())
        .bind(order.shipping_price)
        .bind(order.order_date)
        .bind(order.required_date)
        .bind(order.shipped_date)
        .bind(order.comment)
        .fetch_one(&mut *tx)
        .await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let detail = sqlx::query_as::<_, OrderDetail>(
                "INSERT INTO order_details (order_id, product_id, quantity_ordered, price_each) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING *",
            )
            .bind(created.id)
            .bind(line.product_id)
            .bind(line.quantity_ordered)
            .bind(line.price_each)
            .fetch_one(&mut *tx)
            .await?;
            details.push(detail);
        }

        tx.commit().await?;
        Ok((created, details))
    }

    pub async fn update_comment(&self, id: i32, comment: &str) -> Result<Order, DatabaseError> {
        let order =
            sqlx::query_as::<_, Order>("UPDATE orders SET comment = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(comment)
                .fetch_one(&self.pool)
                .await?;
        Ok(order)
    }

    /// Shipping update; absent fields keep their stored value.
    pub async fn update_shipping(
        &self,
        id: i32,
        status: Option<OrderStatus>,
        shipped_date: Option<DateTime<Utc>>,
    ) -> Result<Order, DatabaseError> {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET \
                status = COALESCE($2, status), \
                shipped_date = COALESCE($3, shipped_date) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(shipped_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }
}
