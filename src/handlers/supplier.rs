// /api/supplier handlers. The whole resource is ADMIN-only.
use axum::extract::Path;

use crate::middleware::{AdminPrincipal, ApiResponse, ApiResult};
use crate::services::supplier_service::{
    CreateSupplierRequest, SupplierResponse, SupplierWithProductsResponse, UpdateSupplierRequest,
};
use crate::services::SupplierService;
use crate::validation::ValidJson;

/// POST /api/supplier
pub async fn create(
    admin: AdminPrincipal,
    ValidJson(request): ValidJson<CreateSupplierRequest>,
) -> ApiResult<SupplierResponse> {
    let service = SupplierService::new().await?;
    let supplier = service.create(admin.username(), request).await?;
    Ok(ApiResponse::created(supplier))
}

/// GET /api/supplier
pub async fn list(_admin: AdminPrincipal) -> ApiResult<Vec<SupplierResponse>> {
    let service = SupplierService::new().await?;
    Ok(ApiResponse::success(service.list().await?))
}

/// GET /api/supplier/:supplierId
pub async fn get(
    _admin: AdminPrincipal,
    Path(supplier_id): Path<i32>,
) -> ApiResult<SupplierResponse> {
    let service = SupplierService::new().await?;
    Ok(ApiResponse::success(service.get(supplier_id).await?))
}

/// GET /api/supplier/:supplierId/products
pub async fn products(
    _admin: AdminPrincipal,
    Path(supplier_id): Path<i32>,
) -> ApiResult<SupplierWithProductsResponse> {
    let service = SupplierService::new().await?;
    Ok(ApiResponse::success(service.with_products(supplier_id).await?))
}

/// PATCH /api/supplier/:supplierId
pub async fn update(
    admin: AdminPrincipal,
    Path(supplier_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateSupplierRequest>,
) -> ApiResult<SupplierResponse> {
    let service = SupplierService::new().await?;
    let supplier = service.update(admin.username(), supplier_id, request).await?;
    Ok(ApiResponse::success(supplier))
}

/// DELETE /api/supplier/:supplierId
pub async fn remove(
    admin: AdminPrincipal,
    Path(supplier_id): Path<i32>,
) -> ApiResult<SupplierResponse> {
    let service = SupplierService::new().await?;
    let supplier = service.remove(admin.username(), supplier_id).await?;
    Ok(ApiResponse::success(supplier))
}
