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
        doctor::{Doctor, DoctorDetail, UpdateDoctorPayload},
    },
};

// GET /api/doctors
#[utoipa::path(
    get,
    path = "/api/doctors",
    tag = "Doctors",
    responses(
        (status = 200, description = "All doctor profiles", body = Vec<Doctor>),
        (status = 403, description = "Admin only")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_doctors(
    State(app_state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let doctors = app_state.doctor_service.list_doctors(&actor).await?;
    Ok((StatusCode::OK, Json(doctors)))
}

// GET /api/doctors/{id}
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    tag = "Doctors",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor profile with stats and rate history", body = DoctorDetail),
        (status = 403, description = "Not the caller's profile"),
        (status = 404, description = "Doctor not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_doctor(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .doctor_service
        .get_doctor(&app_state.db_pool, &actor, id)
        .await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/doctors/{id}
#[utoipa::path(
    patch,
    path = "/api/doctors/{id}",
    tag = "Doctors",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = UpdateDoctorPayload,
    responses(
        (status = 200, description = "Updated doctor profile", body = Doctor),
        (status = 400, description = "Rate out of range"),
        (status = 403, description = "Super admin only"),
        (status = 404, description = "Doctor not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_doctor(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDoctorPayload>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = app_state
        .doctor_service
        .update_doctor(&app_state.db_pool, &actor, id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(doctor)))
}
