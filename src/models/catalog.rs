use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub model_number: Option<String>,
    pub equipment_type: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pricing and availability of one equipment in one city. The counter pair
/// (`quantity`, `quantity_in_use`) is the availability pool; the invariant
/// `0 <= quantity_in_use <= quantity` is enforced by a CHECK constraint and
/// by conditional updates in the repository.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRentalPrice {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub city_id: Uuid,
    pub price_per_day: Decimal,
    pub quantity: i32,
    pub quantity_in_use: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationKind {
    Reserved,
    Released,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityPayload {
    #[validate(length(min = 1, message = "City name is required."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentPayload {
    #[validate(length(min = 1, message = "Equipment name is required."))]
    pub name: String,
    pub model_number: Option<String>,
    pub equipment_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalPricePayload {
    pub city_id: Uuid,
    pub price_per_day: Decimal,
    pub quantity: i32,
}

// One row per counter mutation, so the running counters can be audited
// and replayed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEvent {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub equipment_id: Uuid,
    pub city_id: Uuid,
    pub kind: ReservationKind,
    pub created_at: DateTime<Utc>,
}
