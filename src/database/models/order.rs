use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Order lifecycle states, stored as text in the `orders.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "In Process")]
    InProcess,
    Shipped,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProcess => "In Process",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "In Process" => Some(OrderStatus::InProcess),
            "Shipped" => Some(OrderStatus::Shipped),
            "Cancelled" => Some(OrderStatus::Cancelled),
            "Completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::InProcess
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i32,
    pub username: String,
    pub shipper_id: i32,
    pub status: String,
    pub shipping_price: Decimal,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    pub comment: Option<String>,
}

impl Order {
    /// Typed view of the stored status; unknown values fall back to the
    /// default state rather than panicking on a dirty row.
    pub fn status(&self) -> OrderStatus {
        OrderStatus::parse(&self.status).unwrap_or_default()
    }
}

/// Price snapshot line belonging to one order.
#[derive(Debug, Clone, FromRow)]
pub struct OrderDetail {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity_ordered: i32,
    pub price_each: Decimal,
}
