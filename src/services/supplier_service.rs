use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::manager::DatabaseManager;
use crate::database::models::Supplier;
use crate::database::repositories::SupplierRepository;
use crate::error::ApiError;
use crate::services::product_service::ProductResponse;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 15, message = "phone must be 1-15 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: String,
    #[validate(length(min = 1, max = 255, message = "address must be 1-255 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 15, message = "phone must be 1-15 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255, message = "address must be 1-255 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Supplier plus its eagerly loaded products.
#[derive(Debug, Serialize)]
pub struct SupplierWithProductsResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub products: Vec<ProductResponse>,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            id: supplier.id,
            name: supplier.name,
            phone: supplier.phone,
            address: supplier.address,
        }
    }
}

pub struct SupplierService {
    suppliers: SupplierRepository,
}

impl SupplierService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            suppliers: SupplierRepository::new(pool),
        })
    }

    pub async fn create(
        &self,
        username: &str,
        request: CreateSupplierRequest,
    ) -> Result<SupplierResponse, ApiError> {
        tracing::debug!("{} is creating supplier {}", username, request.name);
        validation::validate(&request)?;

        let supplier = self
            .suppliers
            .create(&request.name, &request.phone, request.address.as_deref())
            .await?;

        Ok(SupplierResponse::from(supplier))
    }

    pub async fn get(&self, supplier_id: i32) -> Result<SupplierResponse, ApiError> {
        let supplier = self
            .suppliers
            .find_by_id(supplier_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier not found"))?;

        Ok(SupplierResponse::from(supplier))
    }

    pub async fn list(&self) -> Result<Vec<SupplierResponse>, ApiError> {
        let suppliers = self.suppliers.find_all().await?;
        Ok(suppliers.into_iter().map(SupplierResponse::from).collect())
    }

    pub async fn with_products(
        &self,
        supplier_id: i32,
    ) -> Result<SupplierWithProductsResponse, ApiError> {
        let supplier = self
            .suppliers
            .find_by_id(supplier_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier not found"))?;

        let products = self.suppliers.products_of(supplier_id).await?;

        Ok(SupplierWithProductsResponse {
            id: supplier.id,
            name: supplier.name,
            phone: supplier.phone,
            address: supplier.address,
            products: products.into_iter().map(ProductResponse::from).collect(),
        })
    }

    pub async fn update(
        &self,
        username: &str,
        supplier_id: i32,
        request: UpdateSupplierRequest,
    ) -> Result<SupplierResponse, ApiError> {
        tracing::debug!("{} is updating supplier {}", username, supplier_id);
        validation::validate(&request)?;

        if self.suppliers.find_by_id(supplier_id).await?.is_none() {
            return Err(ApiError::not_found("Supplier not found"));
        }

        let supplier = self
            .suppliers
            .update(
                supplier_id,
                request.name.as_deref(),
                request.phone.as_deref(),
                request.address.as_deref(),
            )
            .await?;

        Ok(SupplierResponse::from(supplier))
    }

    /// Delete and answer with the pre-deletion snapshot.
    pub async fn remove(
        &self,
        username: &str,
        supplier_id: i32,
    ) -> Result<SupplierResponse, ApiError> {
        tracing::debug!("{} is removing supplier {}", username, supplier_id);

        let supplier = self
            .suppliers
            .find_by_id(supplier_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier not found"))?;

        self.suppliers.delete(supplier_id).await?;

        Ok(SupplierResponse::from(supplier))
    }
}
