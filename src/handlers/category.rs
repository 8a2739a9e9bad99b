// /api/category handlers. Reads are public; writes require ADMIN.
use axum::extract::Path;

use crate::middleware::{AdminPrincipal, ApiResponse, ApiResult};
use crate::services::category_service::{
    CategoryResponse, CategoryWithProductsResponse, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::services::CategoryService;
use crate::validation::ValidJson;

/// POST /api/category
pub async fn create(
    admin: AdminPrincipal,
    ValidJson(request): ValidJson<CreateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let service = CategoryService::new().await?;
    let category = service.create(admin.username(), request).await?;
    Ok(ApiResponse::created(category))
}

/// GET /api/category
pub async fn list() -> ApiResult<Vec<CategoryResponse>> {
    let service = CategoryService::new().await?;
    Ok(ApiResponse::success(service.list().await?))
}

/// GET /api/category/:categoryId
pub async fn get(Path(category_id): Path<i32>) -> ApiResult<CategoryResponse> {
    let service = CategoryService::new().await?;
    Ok(ApiResponse::success(service.get(category_id).await?))
}

/// GET /api/category/:categoryId/products
pub async fn products(Path(category_id): Path<i32>) -> ApiResult<CategoryWithProductsResponse> {
    let service = CategoryService::new().await?;
    Ok(ApiResponse::success(service.with_products(category_id).await?))
}

/// PATCH /api/category/:categoryId
pub async fn update(
    admin: AdminPrincipal,
    Path(category_id): Path<i32>,
    ValidJson(request): ValidJson<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let service = CategoryService::new().await?;
    let category = service.update(admin.username(), category_id, request).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/category/:categoryId
pub async fn remove(
    admin: AdminPrincipal,
    Path(category_id): Path<i32>,
) -> ApiResult<CategoryResponse> {
    let service = CategoryService::new().await?;
    let category = service.remove(admin.username(), category_id).await?;
    Ok(ApiResponse::success(category))
}
