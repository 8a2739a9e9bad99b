// /api/products handlers. Reads and search are public; writes require ADMIN.
use axum::extract::{Path, Query};

use crate::middleware::{AdminPrincipal, ApiResponse, ApiResult};
use crate::services::product_service::{
    CreateProductRequest, ProductResponse, SearchProductRequest, SimpleSearchProductRequest,
    UpdateProductRequest, UpdateProductStockRequest,
};
use crate::services::ProductService;
use crate::validation::ValidJson;

/// POST /api/products
pub async fn create(
    admin: AdminPrincipal,
    ValidJson(request): ValidJson<CreateProductRequest>,
) -> ApiResult<ProductResponse> {
    let service = ProductService::new().await?;
    let product = service.create(admin.username(), request).await?;
    Ok(ApiResponse::created(product))
}

/// GET /api/products?code=&name=&description=&page=&size=
pub async fn list(Query(request): Query<SearchProductRequest>) -> ApiResult<Vec<ProductResponse>> {
    let service = ProductService::new().await?;
    let page = service.list(request).await?;
    Ok(ApiResponse::page(page))
}

/// GET /api/products/search?q=&page=
pub async fn search(
    Query(request): Query<SimpleSearchProductRequest>,
) -> ApiResult<Vec<ProductResponse>> {
    let service = ProductService::new().await?;
    let page = service.quick_search(request).await?;
    Ok(ApiResponse::page(page))
}

/// GET /api/products/:productId
pub async fn get(Path(product_id): Path<i32>) -> ApiResult<ProductResponse> {
    let service = ProductService::new().await?;
    Ok(ApiResponse::success(service.get(product_id).await?))
}

/// PATCH /api/products/:productId
pub async fn update(
    admin: AdminPrincipal,
    Path(product_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateProductRequest>,
) -> ApiResult<ProductResponse> {
    let service = ProductService::new().await?;
    let product = service.update(admin.username(), product_id, request).await?;
    Ok(ApiResponse::success(product))
}

/// PATCH /api/products/:productId/stock
pub async fn update_stock(
    admin: AdminPrincipal,
    Path(product_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateProductStockRequest>,
) -> ApiResult<ProductResponse> {
    let service = ProductService::new().await?;
    let product = service
        .update_stock(admin.username(), product_id, request)
        .await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/:productId
pub async fn remove(
    admin: AdminPrincipal,
    Path(product_id): Path<i32>,
) -> ApiResult<ProductResponse> {
    let service = ProductService::new().await?;
    let product = service.remove(admin.username(), product_id).await?;
    Ok(ApiResponse::success(product))
}
