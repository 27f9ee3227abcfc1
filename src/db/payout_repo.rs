use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{finance::PaymentStatus, payout::Payout},
};

#[derive(Clone)]
pub struct PayoutRepository {
    pool: PgPool,
}

impl PayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        doctor_id: Uuid,
        amount: Decimal,
        period_start: NaiveDate,
        period_end: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Payout, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payout = sqlx::query_as::<_, Payout>(
            r#"
            INSERT INTO payouts (doctor_id, amount, period_start, period_end, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(doctor_id)
        .bind(amount)
        .bind(period_start)
        .bind(period_end)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(payout)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payout>, AppError> {
        let payout = sqlx::query_as::<_, Payout>("SELECT * FROM payouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payout)
    }

    pub async fn list_all(&self) -> Result<Vec<Payout>, AppError> {
        let payouts = sqlx::query_as::<_, Payout>("SELECT * FROM payouts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(payouts)
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Payout>, AppError> {
        let payouts = sqlx::query_as::<_, Payout>(
            "SELECT * FROM payouts WHERE doctor_id = $1 ORDER BY created_at DESC",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payouts)
    }

    /// Writes the full patchable column set; the service decides the values.
    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<DateTime<Utc>>,
        payment_method: Option<&str>,
        transaction_id: Option<&str>,
        receipt_url: Option<&str>,
        notes: Option<&str>,
        processed_by_id: Option<Uuid>,
    ) -> Result<Payout, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payout = sqlx::query_as::<_, Payout>(
            r#"
            UPDATE payouts
            SET status = $2, payment_date = $3, payment_method = $4,
                transaction_id = $5, receipt_url = $6, notes = $7,
                processed_by_id = $8, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(payment_date)
        .bind(payment_method)
        .bind(transaction_id)
        .bind(receipt_url)
        .bind(notes)
        .bind(processed_by_id)
        .fetch_one(executor)
        .await?;
        Ok(payout)
    }

    /// Total already paid out to a doctor, for the pending-commission figure.
    pub async fn sum_paid_for_doctor(&self, doctor_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payouts WHERE doctor_id = $1 AND status = 'PAID'",
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
