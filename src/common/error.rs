use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::lead::LeadStatus;

// Single error type for the whole application. Handlers and services
// return `Result<_, AppError>`; the `IntoResponse` impl decides the wire shape.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    // Ad-hoc input problems that the derive-based validator cannot express
    // (missing days_used, non-positive amounts, inverted periods...).
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("equipment is not offered in this city")]
    EquipmentNotOffered,

    #[error("no units available for this equipment in the requested city")]
    NoUnitsAvailable,

    #[error("cannot transition lead from {from} to {to}")]
    InvalidTransition { from: LeadStatus, to: LeadStatus },

    #[error("{0}")]
    Conflict(String),

    #[error("email already in use")]
    EmailAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("not allowed")]
    Forbidden,

    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("jwt error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return the full per-field detail map for payload validation.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            AppError::EquipmentNotOffered => (
                StatusCode::CONFLICT,
                "This equipment is not offered in the lead's city.".to_string(),
            ),
            AppError::NoUnitsAvailable => (
                StatusCode::CONFLICT,
                "No units of this equipment are available in the requested city.".to_string(),
            ),
            AppError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                format!("Cannot transition lead from {} to {}.", from, to),
            ),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "This email is already in use.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token is invalid or missing.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You are not allowed to perform this action.".to_string(),
            ),

            // Everything else (database, internal) becomes a 500.
            // tracing gets the detailed message, the client gets a generic one.
            ref e => {
                tracing::error!("internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
