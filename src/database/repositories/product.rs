use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::manager::DatabaseError;
use crate::database::models::Product;
use crate::database::paging;

#[derive(Debug)]
pub struct NewProduct<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub price: Decimal,
    pub description: &'a str,
    pub quantity_in_stock: i32,
    pub category_id: i32,
    pub supplier_id: i32,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default)]
pub struct ProductChanges<'a> {
    pub code: Option<&'a str>,
    pub name: Option<&'a str>,
    pub price: Option<Decimal>,
    pub description: Option<&'a str>,
    pub quantity_in_stock: Option<i32>,
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
}

/// AND-combined case-insensitive substring filters over the permitted
/// text columns. Unset fields do not constrain the result.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Product>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Product>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn create(&self, data: &NewProduct<'_>) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products \
                (code, name, price, description, quantity_in_stock, category_id, supplier_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.code)
        .bind(data.name)
        .bind(data.price)
        .bind(data.description)
        .bind(data.quantity_in_stock)
        .bind(data.category_id)
        .bind(data.supplier_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: &ProductChanges<'_>,
    ) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                code = COALESCE($2, code), \
                name = COALESCE($3, name), \
                price = COALESCE($4, price), \
                description = COALESCE($5, description), \
                quantity_in_stock = COALESCE($6, quantity_in_stock), \
                category_id = COALESCE($7, category_id), \
                supplier_id = COALESCE($8, supplier_id) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(changes.code)
        .bind(changes.name)
        .bind(changes.price)
        .bind(changes.description)
        .bind(changes.quantity_in_stock)
        .bind(changes.category_id)
        .bind(changes.supplier_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn set_stock(&self, id: i32, quantity: i32) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET quantity_in_stock = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn search(
        &self,
        filter: &ProductFilter,
        page: i64,
        size: i64,
    ) -> Result<Vec<Product>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM products WHERE 1=1");
        push_filter(&mut query, filter);
        query.push(" ORDER BY id LIMIT ");
        query.push_bind(size);
        query.push(" OFFSET ");
        query.push_bind(paging::offset(page, size));

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn count(&self, filter: &ProductFilter) -> Result<i64, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE 1=1");
        push_filter(&mut query, filter);

        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Single-term search matching code OR name OR description.
    pub async fn quick_search(
        &self,
        term: &str,
        page: i64,
        size: i64,
    ) -> Result<Vec<Product>, DatabaseError> {
        let pattern = like_pattern(term);
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products \
             WHERE code ILIKE $1 OR name ILIKE $1 OR description ILIKE $1 \
             ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(size)
        .bind(paging::offset(page, size))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn quick_count(&self, term: &str) -> Result<i64, DatabaseError> {
        let pattern = like_pattern(term);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products \
             WHERE code ILIKE $1 OR name ILIKE $1 OR description ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(code) = &filter.code {
        query.push(" AND code ILIKE ");
        query.push_bind(like_pattern(code));
    }
    if let Some(name) = &filter.name {
        query.push(" AND name ILIKE ");
        query.push_bind(like_pattern(name));
    }
    if let Some(description) = &filter.description {
        query.push(" AND description ILIKE ");
        query.push_bind(like_pattern(description));
    }
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}
