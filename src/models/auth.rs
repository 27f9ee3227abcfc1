use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    SubAdmin,
    Doctor,
}

// A user row from the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated caller, threaded explicitly into every service call.
/// `doctor_id` is set only for users with the DOCTOR role.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub doctor_id: Option<Uuid>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin | Role::SubAdmin)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_super_admin(&self) -> Result<(), AppError> {
        if matches!(self.role, Role::SuperAdmin) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Doctors act on their own profile; anyone else is rejected.
    pub fn require_doctor(&self) -> Result<Uuid, AppError> {
        match (self.role, self.doctor_id) {
            (Role::Doctor, Some(doctor_id)) => Ok(doctor_id),
            _ => Err(AppError::Forbidden),
        }
    }
}

// Doctor self-registration: creates the user and the doctor profile.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDoctorPayload {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[validate(email(message = "The email provided is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    pub phone: Option<String>,
    pub clinic_name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "The email provided is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}
