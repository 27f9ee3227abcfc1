use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Actor,
        payout::{CreatePayoutPayload, Payout, PayoutOverview, UpdatePayoutPayload},
    },
};

// POST /api/payouts
#[utoipa::path(
    post,
    path = "/api/payouts",
    tag = "Payouts",
    request_body = CreatePayoutPayload,
    responses(
        (status = 201, description = "Payout recorded", body = Payout),
        (status = 400, description = "Invalid amount or period"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Doctor not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payout(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreatePayoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payout = app_state
        .payout_service
        .create_payout(&app_state.db_pool, &actor, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payout)))
}

// GET /api/payouts
#[utoipa::path(
    get,
    path = "/api/payouts",
    tag = "Payouts",
    responses(
        (status = 200, description = "Payouts visible to the caller, with totals", body = PayoutOverview)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payouts(
    State(app_state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.payout_service.list_payouts(&actor).await?;
    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/payouts/{id}
#[utoipa::path(
    get,
    path = "/api/payouts/{id}",
    tag = "Payouts",
    params(("id" = Uuid, Path, description = "Payout id")),
    responses(
        (status = 200, description = "One payout", body = Payout),
        (status = 403, description = "Not the caller's payout"),
        (status = 404, description = "Payout not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payout(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payout = app_state.payout_service.get_payout(&actor, id).await?;
    Ok((StatusCode::OK, Json(payout)))
}

// PATCH /api/payouts/{id}
#[utoipa::path(
    patch,
    path = "/api/payouts/{id}",
    tag = "Payouts",
    params(("id" = Uuid, Path, description = "Payout id")),
    request_body = UpdatePayoutPayload,
    responses(
        (status = 200, description = "Updated payout", body = Payout),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payout not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payout(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePayoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payout = app_state
        .payout_service
        .update_payout(&app_state.db_pool, &actor, id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(payout)))
}
