use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity_in_stock: i32,
    pub category_id: i32,
    pub supplier_id: i32,
}
