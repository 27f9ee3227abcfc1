use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::finance::PaymentStatus;

/// A batch payment to a doctor covering a commission period. The amount is
/// admin-entered; settlement records are not consumed automatically.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: PaymentStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub processed_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayoutPayload {
    pub doctor_id: Uuid,
    pub amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayoutPayload {
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayoutTotals {
    pub total_amount: Decimal,
    pub pending: Decimal,
    pub paid: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayoutOverview {
    pub payouts: Vec<Payout>,
    pub totals: PayoutTotals,
}
