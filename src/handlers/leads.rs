use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::Actor,
        lead::{CreateLeadPayload, Lead, LeadDetail, LeadStatus, UpdateLeadPayload},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub status: Option<LeadStatus>,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown city")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .create_lead(&app_state.db_pool, &actor, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "Leads visible to the caller", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    actor: Actor,
    Query(query): Query<LeadListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list_leads(&actor, query.status).await?;
    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead id")),
    responses(
        (status = 200, description = "Lead with history and settlement data", body = LeadDetail),
        (status = 403, description = "Not the caller's lead"),
        (status = 404, description = "Lead not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .lead_service
        .get_lead(&app_state.db_pool, &actor, id)
        .await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "Lead id")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Updated lead", body = Lead),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Lead not found"),
        (status = 409, description = "Transition rejected or no units available")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state
        .lead_service
        .update_lead(&app_state.db_pool, &actor, id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(lead)))
}
