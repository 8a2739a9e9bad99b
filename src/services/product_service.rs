use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::Product;
use crate::database::paging::{Page, Paging};
use crate::database::repositories::{
    CategoryRepository, NewProduct, ProductChanges, ProductFilter, ProductRepository,
    SupplierRepository,
};
use crate::error::ApiError;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 15, message = "code must be 1-15 characters"))]
    pub code: String,
    #[validate(length(min = 3, max = 100, message = "name must be 3-100 characters"))]
    pub name: String,
    #[validate(custom(function = crate::validation::positive_amount))]
    pub price: Decimal,
    #[validate(length(min = 3, max = 500, message = "description must be 3-500 characters"))]
    pub description: String,
    #[validate(range(min = 0, max = 100_000, message = "quantityInStock must be 0-100000"))]
    pub quantity_in_stock: i32,
    #[validate(range(min = 1, message = "categoryId must be a positive id"))]
    pub category_id: i32,
    #[validate(range(min = 1, message = "supplierId must be a positive id"))]
    pub supplier_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 15, message = "code must be 1-15 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 3, max = 100, message = "name must be 3-100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = crate::validation::positive_amount))]
    pub price: Option<Decimal>,
    #[validate(length(min = 3, max = 500, message = "description must be 3-500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 100_000, message = "quantityInStock must be 0-100000"))]
    pub quantity_in_stock: Option<i32>,
    #[validate(range(min = 1, message = "categoryId must be a positive id"))]
    pub category_id: Option<i32>,
    #[validate(range(min = 1, message = "supplierId must be a positive id"))]
    pub supplier_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductStockRequest {
    #[validate(range(min = 0, max = 100_000, message = "quantity must be 0-100000"))]
    pub quantity: i32,
}

/// Filter + paging payload for the product list endpoint. Unset filters do
/// not constrain the result; page and size fall back to defaults.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchProductRequest {
    #[validate(length(min = 1, max = 15, message = "code must be 1-15 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500, message = "description must be 1-500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "page must be a positive number"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, message = "size must be a positive number"))]
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SimpleSearchProductRequest {
    #[validate(length(min = 1, max = 100, message = "q must be 1-100 characters"))]
    pub q: String,
    #[validate(range(min = 1, message = "page must be a positive number"))]
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub quantity_in_stock: i32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            code: product.code,
            name: product.name,
            price: product.price,
            description: product.description,
            quantity_in_stock: product.quantity_in_stock,
        }
    }
}

pub struct ProductService {
    products: ProductRepository,
    categories: CategoryRepository,
    suppliers: SupplierRepository,
}

impl ProductService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            suppliers: SupplierRepository::new(pool),
        })
    }

    pub async fn create(
        &self,
        username: &str,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, ApiError> {
        tracing::debug!("{} is creating product {}", username, request.code);
        validation::validate(&request)?;

        if self.products.find_by_code(&request.code).await?.is_some() {
            return Err(ApiError::conflict(
                "Product with the same code already exists",
            ));
        }

        if self.products.find_by_name(&request.name).await?.is_some() {
            return Err(ApiError::conflict(
                "Product with the same name already exists",
            ));
        }

        // The two reference checks are independent; run them concurrently.
        let (category, supplier) = tokio::try_join!(
            self.categories.find_by_id(request.category_id),
            self.suppliers.find_by_id(request.supplier_id),
        )?;

        if category.is_none() {
            return Err(ApiError::not_found(format!(
                "Category {} not found",
                request.category_id
            )));
        }
        if supplier.is_none() {
            return Err(ApiError::not_found(format!(
                "Supplier {} not found",
                request.supplier_id
            )));
        }

        let product = self
            .products
            .create(&NewProduct {
                code: &request.code,
                name: &request.name,
                price: request.price,
                description: &request.description,
                quantity_in_stock: request.quantity_in_stock,
                category_id: request.category_id,
                supplier_id: request.supplier_id,
            })
            .await?;

        Ok(ProductResponse::from(product))
    }

    pub async fn get(&self, product_id: i32) -> Result<ProductResponse, ApiError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;

        Ok(ProductResponse::from(product))
    }

    pub async fn list(
        &self,
        request: SearchProductRequest,
    ) -> Result<Page<ProductResponse>, ApiError> {
        validation::validate(&request)?;

        let pagination = &config::config().pagination;
        let page = request.page.unwrap_or(1);
        let size = request
            .size
            .unwrap_or(pagination.default_page_size)
            .min(pagination.max_page_size);

        let filter = ProductFilter {
            code: request.code,
            name: request.name,
            description: request.description,
        };

        let (products, total) = tokio::try_join!(
            self.products.search(&filter, page, size),
            self.products.count(&filter),
        )?;

        Ok(Page {
            items: products.into_iter().map(ProductResponse::from).collect(),
            paging: Paging::new(page, size, total),
        })
    }

    pub async fn quick_search(
        &self,
        request: SimpleSearchProductRequest,
    ) -> Result<Page<ProductResponse>, ApiError> {
        validation::validate(&request)?;

        let page = request.page.unwrap_or(1);
        let size = config::config().pagination.default_page_size;

        let (products, total) = tokio::try_join!(
            self.products.quick_search(&request.q, page, size),
            self.products.quick_count(&request.q),
        )?;

        Ok(Page {
            items: products.into_iter().map(ProductResponse::from).collect(),
            paging: Paging::new(page, size, total),
        })
    }

    pub async fn update(
        &self,
        username: &str,
        product_id: i32,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, ApiError> {
        tracing::debug!("{} is updating product {}", username, product_id);
        validation::validate(&request)?;

        if let Some(code) = &request.code {
            if let Some(existing) = self.products.find_by_code(code).await? {
                if existing.id != product_id {
                    return Err(ApiError::conflict(
                        "Product with the same code already exists",
                    ));
                }
            }
        }

        if let Some(name) = &request.name {
            if let Some(existing) = self.products.find_by_name(name).await? {
                if existing.id != product_id {
                    return Err(ApiError::conflict(
                        "Product with the same name already exists",
                    ));
                }
            }
        }

        if let Some(category_id) = request.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(ApiError::not_found(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }

        if let Some(supplier_id) = request.supplier_id {
            if self.suppliers.find_by_id(supplier_id).await?.is_none() {
                return Err(ApiError::not_found(format!(
                    "Supplier {} not found",
                    supplier_id
                )));
            }
        }

        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(ApiError::not_found("Product not found"));
        }

        let product = self
            .products
            .update(
                product_id,
                &ProductChanges {
                    code: request.code.as_deref(),
                    name: request.name.as_deref(),
                    price: request.price,
                    description: request.description.as_deref(),
                    quantity_in_stock: request.quantity_in_stock,
                    category_id: request.category_id,
                    supplier_id: request.supplier_id,
                },
            )
            .await?;

        Ok(ProductResponse::from(product))
    }

    pub async fn update_stock(
        &self,
        username: &str,
        product_id: i32,
        request: UpdateProductStockRequest,
    ) -> Result<ProductResponse, ApiError> {
        tracing::debug!(
            "{} is setting stock of product {} to {}",
            username,
            product_id,
            request.quantity
        );
        validation::validate(&request)?;

        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(ApiError::not_found("Product not found"));
        }

        let product = self.products.set_stock(product_id, request.quantity).await?;

        Ok(ProductResponse::from(product))
    }

    /// Delete and answer with the pre-deletion snapshot.
    pub async fn remove(
        &self,
        username: &str,
        product_id: i32,
    ) -> Result<ProductResponse, ApiError> {
        tracing::debug!("{} is removing product {}", username, product_id);

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;

        self.products.delete(product_id).await?;

        Ok(ProductResponse::from(product))
    }
}
