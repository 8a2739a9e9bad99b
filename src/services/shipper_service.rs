use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::manager::DatabaseManager;
use crate::database::models::Shipper;
use crate::database::repositories::ShipperRepository;
use crate::error::ApiError;
use crate::services::order_service::OrderSummaryResponse;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShipperRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 15, message = "phone must be 1-15 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShipperRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 15, message = "phone must be 1-15 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipperResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
}

/// Shipper plus its eagerly loaded orders.
#[derive(Debug, Serialize)]
pub struct ShipperWithOrdersResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub orders: Vec<OrderSummaryResponse>,
}

impl From<Shipper> for ShipperResponse {
    fn from(shipper: Shipper) -> Self {
        Self {
            id: shipper.id,
            name: shipper.name,
            phone: shipper.phone,
        }
    }
}

pub struct ShipperService {
    shippers: ShipperRepository,
}

impl ShipperService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            shippers: ShipperRepository::new(pool),
        })
    }

    pub async fn create(
        &self,
        username: &str,
        request: CreateShipperRequest,
    ) -> Result<ShipperResponse, ApiError> {
        tracing::debug!("{} is creating shipper {}", username, request.name);
        validation::validate(&request)?;

        if self.shippers.find_by_name(&request.name).await?.is_some() {
            return Err(ApiError::conflict(
                "Shipper with the same name already exists",
            ));
        }

        let shipper = self.shippers.create(&request.name, &request.phone).await?;

        Ok(ShipperResponse::from(shipper))
    }

    pub async fn get(&self, shipper_id: i32) -> Result<ShipperResponse, ApiError> {
        let shipper = self
            .shippers
            .find_by_id(shipper_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Shipper not found"))?;

        Ok(ShipperResponse::from(shipper))
    }

    pub async fn list(&self) -> Result<Vec<ShipperResponse>, ApiError> {
        let shippers = self.shippers.find_all().await?;
        Ok(shippers.into_iter().map(ShipperResponse::from).collect())
    }

    pub async fn with_orders(&self, shipper_id: i32) -> Result<ShipperWithOrdersResponse, ApiError> {
        let shipper = self
            .shippers
            .find_by_id(shipper_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Shipper not found"))?;

        let orders = self.shippers.orders_of(shipper_id).await?;

        Ok(ShipperWithOrdersResponse {
            id: shipper.id,
            name: shipper.name,
            phone: shipper.phone,
            orders: orders.into_iter().map(OrderSummaryResponse::from).collect(),
        })
    }

    pub async fn update(
        &self,
        username: &str,
        shipper_id: i32,
        request: UpdateShipperRequest,
    ) -> Result<ShipperResponse, ApiError> {
        tracing::debug!("{} is updating shipper {}", username, shipper_id);
        validation::validate(&request)?;

        if let Some(name) = &request.name {
            if let Some(existing) = self.shippers.find_by_name(name).await? {
                if existing.id != shipper_id {
                    return Err(ApiError::conflict(
                        "Shipper with the same name already exists",
                    ));
                }
            }
        }

        if self.shippers.find_by_id(shipper_id).await?.is_none() {
            return Err(ApiError::not_found("Shipper not found"));
        }

        let shipper = self
            .shippers
            .update(shipper_id, request.name.as_deref(), request.phone.as_deref())
            .await?;

        Ok(ShipperResponse::from(shipper))
    }

    /// Delete and answer with the pre-deletion snapshot.
    pub async fn remove(
        &self,
        username: &str,
        shipper_id: i32,
    ) -> Result<ShipperResponse, ApiError> {
        tracing::debug!("{} is removing shipper {}", username, shipper_id);

        let shipper = self
            .shippers
            .find_by_id(shipper_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Shipper not found"))?;

        self.shippers.delete(shipper_id).await?;

        Ok(ShipperResponse::from(shipper))
    }
}
