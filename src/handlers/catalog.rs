use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Actor,
        catalog::{
            City, CreateCityPayload, CreateEquipmentPayload, CreateRentalPricePayload, Equipment,
            EquipmentRentalPrice,
        },
    },
};

// POST /api/cities
#[utoipa::path(
    post,
    path = "/api/cities",
    tag = "Catalog",
    request_body = CreateCityPayload,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 409, description = "City already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_city(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateCityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let city = app_state
        .catalog_service
        .create_city(&app_state.db_pool, &actor, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(city)))
}

// GET /api/cities
#[utoipa::path(
    get,
    path = "/api/cities",
    tag = "Catalog",
    responses((status = 200, description = "All cities", body = Vec<City>)),
    security(("api_jwt" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cities = app_state.catalog_service.list_cities().await?;
    Ok((StatusCode::OK, Json(cities)))
}

// POST /api/equipment
#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "Catalog",
    request_body = CreateEquipmentPayload,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_equipment(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateEquipmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let equipment = app_state
        .catalog_service
        .create_equipment(&app_state.db_pool, &actor, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

// GET /api/equipment
#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "Catalog",
    responses((status = 200, description = "All equipment", body = Vec<Equipment>)),
    security(("api_jwt" = []))
)]
pub async fn list_equipment(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let equipment = app_state.catalog_service.list_equipment().await?;
    Ok((StatusCode::OK, Json(equipment)))
}

// POST /api/equipment/{id}/rental-prices
#[utoipa::path(
    post,
    path = "/api/equipment/{id}/rental-prices",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Equipment id")),
    request_body = CreateRentalPricePayload,
    responses(
        (status = 201, description = "Rental price created", body = EquipmentRentalPrice),
        (status = 404, description = "Equipment or city not found"),
        (status = 409, description = "Price already exists for this pair")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_rental_price(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateRentalPricePayload>,
) -> Result<impl IntoResponse, AppError> {
    let price = app_state
        .catalog_service
        .create_rental_price(&app_state.db_pool, &actor, id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(price)))
}

// GET /api/equipment/{id}/rental-prices
#[utoipa::path(
    get,
    path = "/api/equipment/{id}/rental-prices",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Equipment id")),
    responses(
        (status = 200, description = "Pricing rows for the equipment", body = Vec<EquipmentRentalPrice>),
        (status = 404, description = "Equipment not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rental_prices(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let prices = app_state
        .catalog_service
        .list_rental_prices(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(prices)))
}
