use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Actor,
        finance::{Financial, FinancialOverview, PaymentStatus, UpdateFinancialPayload},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FinancialListQuery {
    pub status: Option<PaymentStatus>,
}

// GET /api/financials
#[utoipa::path(
    get,
    path = "/api/financials",
    tag = "Financials",
    params(FinancialListQuery),
    responses(
        (status = 200, description = "Settlement records with running totals", body = FinancialOverview),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_financials(
    State(app_state): State<AppState>,
    actor: Actor,
    Query(query): Query<FinancialListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state
        .finance_service
        .list_financials(&actor, query.status)
        .await?;
    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/financials/{id}
#[utoipa::path(
    get,
    path = "/api/financials/{id}",
    tag = "Financials",
    params(("id" = Uuid, Path, description = "Financial record id")),
    responses(
        (status = 200, description = "One settlement record", body = Financial),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Record not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_financial(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let financial = app_state.finance_service.get_financial(&actor, id).await?;
    Ok((StatusCode::OK, Json(financial)))
}

// PATCH /api/financials/{id}
#[utoipa::path(
    patch,
    path = "/api/financials/{id}",
    tag = "Financials",
    params(("id" = Uuid, Path, description = "Financial record id")),
    request_body = UpdateFinancialPayload,
    responses(
        (status = 200, description = "Record with updated payment status", body = Financial),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Record not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_financial(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFinancialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let financial = app_state
        .finance_service
        .update_payment_status(&app_state.db_pool, &actor, id, payload.payment_status)
        .await?;
    Ok((StatusCode::OK, Json(financial)))
}
