use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoctorStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub clinic_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub commission_rate: Decimal,
    pub status: DoctorStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Append-only audit of commission-rate changes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionHistory {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub old_rate: Decimal,
    pub new_rate: Decimal,
    pub effective_date: DateTime<Utc>,
    pub changed_by: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    pub total_leads: i64,
    pub completed_leads: i64,
    pub active_leads: i64,
    pub total_earnings: Decimal,
    /// Settled commission not yet covered by a PAID payout.
    pub pending_commission: Decimal,
}

// Admin patch; a present commission_rate that differs from the current one
// appends a commission-history row.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorPayload {
    pub commission_rate: Option<Decimal>,
    pub reason: Option<String>,
    pub clinic_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetail {
    pub doctor: Doctor,
    pub name: String,
    pub email: String,
    pub stats: DoctorStats,
    pub commission_history: Vec<CommissionHistory>,
}
