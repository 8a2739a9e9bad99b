use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Order, OrderDetail, OrderStatus};
use crate::database::paging::{Page, Paging};
use crate::database::repositories::{
    NewOrder, NewOrderLine, OrderRepository, ProductRepository, ShipperRepository,
};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(custom(function = crate::validation::positive_amount))]
    pub shipping_price: Decimal,
    #[validate(length(max = 255, message = "comment must be at most 255 characters"))]
    pub comment: Option<String>,
    pub status: Option<OrderStatus>,
    #[validate(range(min = 1, message = "shipperId must be a positive id"))]
    pub shipper_id: i32,
    #[validate(custom(function = crate::validation::not_in_future))]
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    pub shipped_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "order must contain at least one line"), nested)]
    pub order_detail: Vec<OrderDetailRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailRequest {
    #[validate(range(min = 1, message = "productId must be a positive id"))]
    pub product_id: i32,
    #[validate(range(min = 1, message = "quantityOrdered must be a positive number"))]
    pub quantity_ordered: i32,
    #[validate(custom(function = crate::validation::positive_amount))]
    pub price_each: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdateOrderRequest {
    #[validate(length(max = 255, message = "comment must be at most 255 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingUpdateOrderRequest {
    pub shipped_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
}

/// Order with its lines eagerly loaded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub username: String,
    pub shipping_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub status: OrderStatus,
    pub shipper_id: i32,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_date: Option<DateTime<Utc>>,
    pub order_detail: Vec<OrderDetailResponse>,
}

/// Order without its lines, for list views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub id: i32,
    pub username: String,
    pub shipping_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub status: OrderStatus,
    pub shipper_id: i32,
    pub order_date: DateTime<Utc>,
    pub required_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub product_id: i32,
    pub quantity_ordered: i32,
    pub price_each: Decimal,
}

impl OrderResponse {
    fn project(order: Order, details: Vec<OrderDetail>) -> Self {
        let status = order.status();
        Self {
            id: order.id,
            username: order.username,
            shipping_price: order.shipping_price,
            comment: order.comment,
            status,
            shipper_id: order.shipper_id,
            order_date: order.order_date,
            required_date: order.required_date,
            shipped_date: order.shipped_date,
            order_detail: details.into_iter().map(OrderDetailResponse::from).collect(),
        }
    }
}

impl From<Order> for OrderSummaryResponse {
    fn from(order: Order) -> Self {
        let status = order.status();
        Self {
            id: order.id,
            username: order.username,
            shipping_price: order.shipping_price,
            comment: order.comment,
            status,
            shipper_id: order.shipper_id,
            order_date: order.order_date,
            required_date: order.required_date,
            shipped_date: order.shipped_date,
        }
    }
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            product_id: detail.product_id,
            quantity_ordered: detail.quantity_ordered,
            price_each: detail.price_each,
        }
    }
}

pub struct OrderService {
    orders: OrderRepository,
    products: ProductRepository,
    shippers: ShipperRepository,
}

impl OrderService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            orders: OrderRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            shippers: ShipperRepository::new(pool),
        })
    }

    /// Place an order. The shipper and every referenced product must exist
    /// and carry enough stock; the order and its lines are written in one
    /// transaction. Stock itself is not decremented here.
    pub async fn create(
        &self,
        username: &str,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        tracing::debug!("{} is creating an order", username);
        validation::validate(&request)?;

        if self.shippers.find_by_id(request.shipper_id).await?.is_none() {
            return Err(ApiError::not_found("Shipper not found"));
        }

        for line in &request.order_detail {
            let product = self
                .products
                .find_by_id(line.product_id)
                .await?
                .ok_or_else(|| {
                    ApiError::not_found(format!("Product {} not found", line.product_id))
                })?;

            if product.quantity_in_stock < line.quantity_ordered {
                return Err(ApiError::bad_request(format!(
                    "Product {} not enough in stock",
                    line.product_id
                )));
            }
        }

        let lines: Vec<NewOrderLine> = request
            .order_detail
            .iter()
            .map(|line| NewOrderLine {
                product_id: line.product_id,
                quantity_ordered: line.quantity_ordered,
                price_each: line.price_each,
            })
            .collect();

        let (order, details) = self
            .orders
            .create_with_lines(
                username,
                &NewOrder {
                    shipper_id: request.shipper_id,
                    status: request.status.unwrap_or_default(),
                    shipping_price: request.shipping_price,
                    order_date: request.order_date,
                    required_date: request.required_date,
                    shipped_date: request.shipped_date,
                    comment: request.comment.as_deref(),
                },
                &lines,
            )
            .await?;

        Ok(OrderResponse::project(order, details))
    }

    /// Fetch one order. Regular users only see their own; an absent or
    /// foreign order is a plain 404 either way.
    pub async fn get(&self, principal: &Principal, order_id: i32) -> Result<OrderResponse, ApiError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|order| principal.is_admin() || order.username == principal.username())
            .ok_or_else(|| ApiError::not_found("Order not found"))?;

        let details = self.orders.details_of(order.id).await?;

        Ok(OrderResponse::project(order, details))
    }

    pub async fn list(
        &self,
        username: &str,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<Page<OrderSummaryResponse>, ApiError> {
        let pagination = &config::config().pagination;
        let page = page.unwrap_or(1).max(1);
        let size = size
            .unwrap_or(pagination.default_page_size)
            .clamp(1, pagination.max_page_size);

        let (orders, total) = tokio::try_join!(
            self.orders.list_for_user(username, page, size),
            self.orders.count_for_user(username),
        )?;

        Ok(Page {
            items: orders.into_iter().map(OrderSummaryResponse::from).collect(),
            paging: Paging::new(page, size, total),
        })
    }

    /// Owner-side update; only the comment is mutable through this path.
    pub async fn update_comment(
        &self,
        principal: &Principal,
        order_id: i32,
        request: UserUpdateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        tracing::debug!("{} is updating order {}", principal.username(), order_id);
        validation::validate(&request)?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|order| principal.is_admin() || order.username == principal.username())
            .ok_or_else(|| ApiError::not_found("Order not found"))?;

        let order = match request.comment.as_deref() {
            Some(comment) => self.orders.update_comment(order.id, comment).await?,
            None => order,
        };

        let details = self.orders.details_of(order.id).await?;

        Ok(OrderResponse::project(order, details))
    }

    /// Admin-side shipping update: status and/or shipped date.
    pub async fn update_shipping(
        &self,
        username: &str,
        order_id: i32,
        request: ShippingUpdateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        tracing::debug!("{} is updating shipping of order {}", username, order_id);
        validation::validate(&request)?;

        if self.orders.find_by_id(order_id).await?.is_none() {
            return Err(ApiError::not_found("Order not found"));
        }

        let order = self
            .orders
            .update_shipping(order_id, request.status, request.shipped_date)
            .await?;

        let details = self.orders.details_of(order.id).await?;

        Ok(OrderResponse::project(order, details))
    }
}
