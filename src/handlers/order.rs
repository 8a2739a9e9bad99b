// /api/orders handlers. Everything requires an authenticated principal;
// regular users only ever see their own orders.
use axum::extract::{Path, Query};
use serde::Deserialize;

use crate::middleware::{AdminPrincipal, ApiResponse, ApiResult, Principal};
use crate::services::order_service::{
    CreateOrderRequest, OrderResponse, OrderSummaryResponse, ShippingUpdateOrderRequest,
    UserUpdateOrderRequest,
};
use crate::services::OrderService;
use crate::validation::ValidJson;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// POST /api/orders
pub async fn create(
    principal: Principal,
    ValidJson(request): ValidJson<CreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let service = OrderService::new().await?;
    let order = service.create(principal.username(), request).await?;
    Ok(ApiResponse::created(order))
}

/// GET /api/orders?page=&size=
pub async fn list(
    principal: Principal,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Vec<OrderSummaryResponse>> {
    let service = OrderService::new().await?;
    let page = service
        .list(principal.username(), query.page, query.size)
        .await?;
    Ok(ApiResponse::page(page))
}

/// GET /api/orders/:orderId
pub async fn get(principal: Principal, Path(order_id): Path<i32>) -> ApiResult<OrderResponse> {
    let service = OrderService::new().await?;
    Ok(ApiResponse::success(service.get(&principal, order_id).await?))
}

/// PATCH /api/orders/:orderId
pub async fn update(
    principal: Principal,
    Path(order_id): Path<i32>,
    ValidJson(request): ValidJson<UserUpdateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let service = OrderService::new().await?;
    let order = service.update_comment(&principal, order_id, request).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/:orderId/shipping
pub async fn update_shipping(
    admin: AdminPrincipal,
    Path(order_id): Path<i32>,
    ValidJson(request): ValidJson<ShippingUpdateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let service = OrderService::new().await?;
    let order = service
        .update_shipping(admin.username(), order_id, request)
        .await?;
    Ok(ApiResponse::success(order))
}
