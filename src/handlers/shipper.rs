// /api/shippers handlers. Reads are public; writes and the orders view
// require ADMIN.
use axum::extract::Path;

use crate::middleware::{AdminPrincipal, ApiResponse, ApiResult};
use crate::services::shipper_service::{
    CreateShipperRequest, ShipperResponse, ShipperWithOrdersResponse, UpdateShipperRequest,
};
use crate::services::ShipperService;
use crate::validation::ValidJson;

/// POST /api/shippers
pub async fn create(
    admin: AdminPrincipal,
    ValidJson(request): ValidJson<CreateShipperRequest>,
) -> ApiResult<ShipperResponse> {
    let service = ShipperService::new().await?;
    let shipper = service.create(admin.username(), request).await?;
    Ok(ApiResponse::created(shipper))
}

/// GET /api/shippers
pub async fn list() -> ApiResult<Vec<ShipperResponse>> {
    let service = ShipperService::new().await?;
    Ok(ApiResponse::success(service.list().await?))
}

/// GET /api/shippers/:shipperId
pub async fn get(Path(shipper_id): Path<i32>) -> ApiResult<ShipperResponse> {
    let service = ShipperService::new().await?;
    Ok(ApiResponse::success(service.get(shipper_id).await?))
}

/// GET /api/shippers/:shipperId/orders
pub async fn orders(
    _admin: AdminPrincipal,
    Path(shipper_id): Path<i32>,
) -> ApiResult<ShipperWithOrdersResponse> {
    let service = ShipperService::new().await?;
    Ok(ApiResponse::success(service.with_orders(shipper_id).await?))
}

/// PATCH /api/shippers/:shipperId
pub async fn update(
    admin: AdminPrincipal,
    Path(shipper_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateShipperRequest>,
) -> ApiResult<ShipperResponse> {
    let service = ShipperService::new().await?;
    let shipper = service.update(admin.username(), shipper_id, request).await?;
    Ok(ApiResponse::success(shipper))
}

/// DELETE /api/shippers/:shipperId
pub async fn remove(
    admin: AdminPrincipal,
    Path(shipper_id): Path<i32>,
) -> ApiResult<ShipperResponse> {
    let service = ShipperService::new().await?;
    let shipper = service.remove(admin.username(), shipper_id).await?;
    Ok(ApiResponse::success(shipper))
}
