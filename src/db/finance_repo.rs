use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{Financial, PaymentStatus, Rental, RentalStatus},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Rentals (one per lead, upserted at closure)
    // ---

    pub async fn upsert_rental<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        equipment_id: Uuid,
        days_used: i32,
        end_datetime: DateTime<Utc>,
        status: RentalStatus,
    ) -> Result<Rental, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (lead_id, equipment_id, days_used, end_datetime, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (lead_id)
            DO UPDATE SET
                equipment_id = $2,
                days_used = $3,
                end_datetime = $4,
                status = $5,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(equipment_id)
        .bind(days_used)
        .bind(end_datetime)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(rental)
    }

    pub async fn find_rental_by_lead<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
    ) -> Result<Option<Rental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE lead_id = $1")
            .bind(lead_id)
            .fetch_optional(executor)
            .await?;
        Ok(rental)
    }

    // ---
    // Financials
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_financial<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        rental_amount: Decimal,
        shipping_cost: Decimal,
        gst_amount: Decimal,
        base_amount: Decimal,
        commission_rate_applied: Decimal,
        doctor_commission: Decimal,
        net_profit: Decimal,
        payment_status: PaymentStatus,
        payment_received_date: Option<DateTime<Utc>>,
    ) -> Result<Financial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let financial = sqlx::query_as::<_, Financial>(
            r#"
            INSERT INTO financials
                (lead_id, rental_amount, shipping_cost, gst_amount, base_amount,
                 commission_rate_applied, doctor_commission, net_profit,
                 payment_status, payment_received_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (lead_id)
            DO UPDATE SET
                rental_amount = $2,
                shipping_cost = $3,
                gst_amount = $4,
                base_amount = $5,
                commission_rate_applied = $6,
                doctor_commission = $7,
                net_profit = $8,
                payment_status = $9,
                payment_received_date = $10,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(rental_amount)
        .bind(shipping_cost)
        .bind(gst_amount)
        .bind(base_amount)
        .bind(commission_rate_applied)
        .bind(doctor_commission)
        .bind(net_profit)
        .bind(payment_status)
        .bind(payment_received_date)
        .fetch_one(executor)
        .await?;
        Ok(financial)
    }

    pub async fn find_financial_by_lead<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
    ) -> Result<Option<Financial>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let financial =
            sqlx::query_as::<_, Financial>("SELECT * FROM financials WHERE lead_id = $1")
                .bind(lead_id)
                .fetch_optional(executor)
                .await?;
        Ok(financial)
    }

    pub async fn find_financial(&self, id: Uuid) -> Result<Option<Financial>, AppError> {
        let financial = sqlx::query_as::<_, Financial>("SELECT * FROM financials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(financial)
    }

    pub async fn list_financials(
        &self,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Financial>, AppError> {
        let financials = match status {
            Some(status) => {
                sqlx::query_as::<_, Financial>(
                    "SELECT * FROM financials WHERE payment_status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Financial>("SELECT * FROM financials ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(financials)
    }

    pub async fn update_payment_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: PaymentStatus,
        payment_received_date: Option<DateTime<Utc>>,
    ) -> Result<Financial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let financial = sqlx::query_as::<_, Financial>(
            r#"
            UPDATE financials
            SET payment_status = $2, payment_received_date = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(payment_received_date)
        .fetch_one(executor)
        .await?;
        Ok(financial)
    }
}
