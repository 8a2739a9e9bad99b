use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::manager::DatabaseManager;
use crate::database::models::Category;
use crate::database::repositories::CategoryRepository;
use crate::error::ApiError;
use crate::services::product_service::ProductResponse;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Category plus its eagerly loaded products; a distinct shape rather than
/// an optional field on `CategoryResponse`.
#[derive(Debug, Serialize)]
pub struct CategoryWithProductsResponse {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub products: Vec<ProductResponse>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            categories: CategoryRepository::new(pool),
        })
    }

    pub async fn create(
        &self,
        username: &str,
        request: CreateCategoryRequest,
    ) -> Result<CategoryResponse, ApiError> {
        tracing::debug!("{} is creating category {}", username, request.name);
        validation::validate(&request)?;

        if self.categories.find_by_name(&request.name).await?.is_some() {
            return Err(ApiError::conflict(
                "Category with the same name already exists",
            ));
        }

        let category = self
            .categories
            .create(&request.name, request.description.as_deref())
            .await?;

        Ok(CategoryResponse::from(category))
    }

    pub async fn get(&self, category_id: i32) -> Result<CategoryResponse, ApiError> {
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        Ok(CategoryResponse::from(category))
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        let categories = self.categories.find_all().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn with_products(
        &self,
        category_id: i32,
    ) -> Result<CategoryWithProductsResponse, ApiError> {
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        let products = self.categories.products_of(category_id).await?;

        Ok(CategoryWithProductsResponse {
            id: category.id,
            name: category.name,
            description: category.description,
            products: products.into_iter().map(ProductResponse::from).collect(),
        })
    }

    pub async fn update(
        &self,
        username: &str,
        category_id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryResponse, ApiError> {
        tracing::debug!("{} is updating category {}", username, category_id);
        validation::validate(&request)?;

        // Renaming to a name held by a different row is a conflict; keeping
        // the current name is not.
        if let Some(name) = &request.name {
            if let Some(existing) = self.categories.find_by_name(name).await? {
                if existing.id != category_id {
                    return Err(ApiError::conflict(
                        "Category with the same name already exists",
                    ));
                }
            }
        }

        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(ApiError::not_found("Category not found"));
        }

        let category = self
            .categories
            .update(category_id, request.name.as_deref(), request.description.as_deref())
            .await?;

        Ok(CategoryResponse::from(category))
    }

    /// Delete and answer with the pre-deletion snapshot.
    pub async fn remove(
        &self,
        username: &str,
        category_id: i32,
    ) -> Result<CategoryResponse, ApiError> {
        tracing::debug!("{} is removing category {}", username, category_id);

        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        self.categories.delete(category_id).await?;

        Ok(CategoryResponse::from(category))
    }
}
