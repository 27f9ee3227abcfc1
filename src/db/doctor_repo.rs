use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::doctor::{CommissionHistory, Doctor},
};

#[derive(Clone)]
pub struct DoctorRepository {
    pool: PgPool,
}

impl DoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_doctor<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        clinic_name: Option<&str>,
        phone: Option<&str>,
        city: Option<&str>,
        commission_rate: Decimal,
    ) -> Result<Doctor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let doctor = sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (user_id, clinic_name, phone, city, commission_rate)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(clinic_name)
        .bind(phone)
        .bind(city)
        .bind(commission_rate)
        .fetch_one(executor)
        .await?;
        Ok(doctor)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Doctor>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(doctor)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Doctor>, AppError> {
        let doctor = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doctor)
    }

    pub async fn list(&self) -> Result<Vec<Doctor>, AppError> {
        let doctors = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(doctors)
    }

    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        clinic_name: Option<&str>,
        phone: Option<&str>,
        city: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE doctors
            SET clinic_name = $2, phone = $3, city = $4, notes = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(clinic_name)
        .bind(phone)
        .bind(city)
        .bind(notes)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_commission_rate<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        new_rate: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE doctors SET commission_rate = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(new_rate)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn append_commission_history<'e, E>(
        &self,
        executor: E,
        doctor_id: Uuid,
        old_rate: Decimal,
        new_rate: Decimal,
        changed_by: Uuid,
        reason: Option<&str>,
    ) -> Result<CommissionHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, CommissionHistory>(
            r#"
            INSERT INTO commission_history (doctor_id, old_rate, new_rate, changed_by, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(doctor_id)
        .bind(old_rate)
        .bind(new_rate)
        .bind(changed_by)
        .bind(reason)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn list_commission_history(
        &self,
        doctor_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CommissionHistory>, AppError> {
        let history = sqlx::query_as::<_, CommissionHistory>(
            r#"
            SELECT * FROM commission_history
            WHERE doctor_id = $1
            ORDER BY effective_date DESC
            LIMIT $2
            "#,
        )
        .bind(doctor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }

    // ---
    // Aggregates for the doctor detail view
    // ---

    pub async fn count_leads(
        &self,
        doctor_id: Uuid,
        statuses: Option<&[&str]>,
    ) -> Result<i64, AppError> {
        let count = match statuses {
            Some(statuses) => {
                let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM leads WHERE doctor_id = $1 AND status = ANY($2)",
                )
                .bind(doctor_id)
                .bind(&statuses)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads WHERE doctor_id = $1")
                    .bind(doctor_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    /// Sum of settled commissions across all of the doctor's leads.
    pub async fn total_earnings(&self, doctor_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(f.doctor_commission), 0)
            FROM financials f
            JOIN leads l ON l.id = f.lead_id
            WHERE l.doctor_id = $1
            "#,
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
