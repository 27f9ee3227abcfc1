use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::{
        auth::Actor,
        catalog::{
            City, CreateCityPayload, CreateEquipmentPayload, CreateRentalPricePayload, Equipment,
            EquipmentRentalPrice,
        },
    },
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    pub async fn create_city(
        &self,
        pool: &PgPool,
        actor: &Actor,
        payload: &CreateCityPayload,
    ) -> Result<City, AppError> {
        actor.require_admin()?;
        self.catalog_repo.create_city(pool, payload.name.trim()).await
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        self.catalog_repo.list_cities().await
    }

    pub async fn create_equipment(
        &self,
        pool: &PgPool,
        actor: &Actor,
        payload: &CreateEquipmentPayload,
    ) -> Result<Equipment, AppError> {
        actor.require_admin()?;
        self.catalog_repo
            .create_equipment(
                pool,
                &payload.name,
                payload.model_number.as_deref(),
                payload.equipment_type.as_deref(),
                payload.description.as_deref(),
            )
            .await
    }

    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, AppError> {
        self.catalog_repo.list_equipment().await
    }

    /// Registers pricing and stock for one equipment in one city. The pair
    /// is unique; a second submission for the same pair is rejected.
    pub async fn create_rental_price(
        &self,
        pool: &PgPool,
        actor: &Actor,
        equipment_id: Uuid,
        payload: &CreateRentalPricePayload,
    ) -> Result<EquipmentRentalPrice, AppError> {
        actor.require_admin()?;

        if payload.price_per_day <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "Price per day must be positive.".to_string(),
            ));
        }
        if payload.quantity < 0 {
            return Err(AppError::InvalidInput(
                "Quantity cannot be negative.".to_string(),
            ));
        }

        self.catalog_repo
            .find_equipment(pool, equipment_id)
            .await?
            .ok_or(AppError::NotFound("equipment"))?;
        self.catalog_repo
            .find_city(pool, payload.city_id)
            .await?
            .ok_or(AppError::NotFound("city"))?;

        self.catalog_repo
            .create_rental_price(
                pool,
                equipment_id,
                payload.city_id,
                payload.price_per_day,
                payload.quantity,
            )
            .await
    }

    pub async fn list_rental_prices(
        &self,
        pool: &PgPool,
        equipment_id: Uuid,
    ) -> Result<Vec<EquipmentRentalPrice>, AppError> {
        self.catalog_repo
            .find_equipment(pool, equipment_id)
            .await?
            .ok_or(AppError::NotFound("equipment"))?;
        self.catalog_repo.list_rental_prices(pool, equipment_id).await
    }
}
