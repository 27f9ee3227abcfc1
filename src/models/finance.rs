use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Active,
    Completed,
    Cancelled,
}

// One-to-one with a lead; upserted when the lead closes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub equipment_id: Uuid,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub days_used: i32,
    pub billing_increment: String,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Financial outcome of a settled lead. `commission_rate_applied` is the
/// doctor's rate frozen at settlement time; later rate changes never touch
/// this record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub rental_amount: Decimal,
    pub shipping_cost: Decimal,
    pub gst_amount: Decimal,
    pub other_expenses: serde_json::Value,
    pub base_amount: Decimal,
    pub commission_rate_applied: Decimal,
    pub doctor_commission: Decimal,
    pub net_profit: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_received_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFinancialPayload {
    pub payment_status: PaymentStatus,
}

// Aggregates for the admin financial overview.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTotals {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_commission: Decimal,
    pub total_profit: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub financials: Vec<Financial>,
    pub totals: FinancialTotals,
}
