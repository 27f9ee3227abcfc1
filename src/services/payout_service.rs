use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DoctorRepository, PayoutRepository},
    models::{
        auth::Actor,
        finance::PaymentStatus,
        payout::{CreatePayoutPayload, Payout, PayoutOverview, PayoutTotals, UpdatePayoutPayload},
    },
};

#[derive(Clone)]
pub struct PayoutService {
    payout_repo: PayoutRepository,
    doctor_repo: DoctorRepository,
}

impl PayoutService {
    pub fn new(payout_repo: PayoutRepository, doctor_repo: DoctorRepository) -> Self {
        Self {
            payout_repo,
            doctor_repo,
        }
    }

    /// Records a payout for a commission period. The amount is entered by
    /// the admin; nothing is deducted from settlement records.
    pub async fn create_payout(
        &self,
        pool: &PgPool,
        actor: &Actor,
        payload: &CreatePayoutPayload,
    ) -> Result<Payout, AppError> {
        actor.require_admin()?;

        if payload.amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "Payout amount must be positive.".to_string(),
            ));
        }
        if payload.period_start > payload.period_end {
            return Err(AppError::InvalidInput(
                "Period start must not be after period end.".to_string(),
            ));
        }

        self.doctor_repo
            .find_by_id(pool, payload.doctor_id)
            .await?
            .ok_or(AppError::NotFound("doctor"))?;

        let payout = self
            .payout_repo
            .create(
                pool,
                payload.doctor_id,
                payload.amount,
                payload.period_start,
                payload.period_end,
                payload.notes.as_deref(),
            )
            .await?;

        tracing::info!(payout_id = %payout.id, doctor_id = %payload.doctor_id, "payout created");
        Ok(payout)
    }

    /// Admins see every payout; a doctor only their own.
    pub async fn list_payouts(&self, actor: &Actor) -> Result<PayoutOverview, AppError> {
        let payouts = if actor.is_admin() {
            self.payout_repo.list_all().await?
        } else {
            let doctor_id = actor.require_doctor()?;
            self.payout_repo.list_by_doctor(doctor_id).await?
        };

        let mut totals = PayoutTotals {
            total_amount: Decimal::ZERO,
            pending: Decimal::ZERO,
            paid: Decimal::ZERO,
        };
        for p in &payouts {
            totals.total_amount += p.amount;
            match p.status {
                PaymentStatus::Pending => totals.pending += p.amount,
                PaymentStatus::Paid => totals.paid += p.amount,
                PaymentStatus::Cancelled => {}
            }
        }

        Ok(PayoutOverview { payouts, totals })
    }

    pub async fn get_payout(&self, actor: &Actor, id: Uuid) -> Result<Payout, AppError> {
        let payout = self
            .payout_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("payout"))?;

        if !actor.is_admin() && actor.require_doctor()? != payout.doctor_id {
            return Err(AppError::Forbidden);
        }
        Ok(payout)
    }

    /// Patches payment details. The first transition to PAID stamps the
    /// payment date and records who processed it; both stick afterwards.
    pub async fn update_payout(
        &self,
        pool: &PgPool,
        actor: &Actor,
        id: Uuid,
        payload: &UpdatePayoutPayload,
    ) -> Result<Payout, AppError> {
        actor.require_admin()?;

        let payout = self
            .payout_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("payout"))?;

        let status = payload.status.unwrap_or(payout.status);

        let payment_date = payload
            .payment_date
            .or(payout.payment_date)
            .or_else(|| match status {
                PaymentStatus::Paid => Some(Utc::now()),
                _ => None,
            });

        let processed_by_id = payout.processed_by_id.or(match status {
            PaymentStatus::Paid => Some(actor.user_id),
            _ => None,
        });

        let updated = self
            .payout_repo
            .update(
                pool,
                id,
                status,
                payment_date,
                payload
                    .payment_method
                    .as_deref()
                    .or(payout.payment_method.as_deref()),
                payload
                    .transaction_id
                    .as_deref()
                    .or(payout.transaction_id.as_deref()),
                payload
                    .receipt_url
                    .as_deref()
                    .or(payout.receipt_url.as_deref()),
                payload.notes.as_deref().or(payout.notes.as_deref()),
                processed_by_id,
            )
            .await?;

        tracing::info!(payout_id = %id, status = ?status, "payout updated");
        Ok(updated)
    }
}
