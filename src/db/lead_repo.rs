use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadStatus, LeadStatusHistory},
};

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        doctor_id: Uuid,
        patient_name: &str,
        parent_name: &str,
        parent_email: &str,
        patient_phone: &str,
        patient_location: &str,
        city_id: Uuid,
        notes: Option<&str>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (doctor_id, patient_name, parent_name, parent_email,
                 patient_phone, patient_location, city_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(doctor_id)
        .bind(patient_name)
        .bind(parent_name)
        .bind(parent_email)
        .bind(patient_phone)
        .bind(patient_location)
        .bind(city_id)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(lead)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    /// Locks the lead row for the rest of the transaction, so concurrent
    /// status updates and assignments serialize per lead.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    pub async fn list_all(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>, AppError> {
        let leads = match status {
            Some(status) => {
                sqlx::query_as::<_, Lead>(
                    "SELECT * FROM leads WHERE status = $1 ORDER BY submission_date DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY submission_date DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(leads)
    }

    pub async fn list_by_doctor(
        &self,
        doctor_id: Uuid,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = match status {
            Some(status) => {
                sqlx::query_as::<_, Lead>(
                    r#"
                    SELECT * FROM leads
                    WHERE doctor_id = $1 AND status = $2
                    ORDER BY submission_date DESC
                    "#,
                )
                .bind(doctor_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Lead>(
                    "SELECT * FROM leads WHERE doctor_id = $1 ORDER BY submission_date DESC",
                )
                .bind(doctor_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(leads)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE leads SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_assigned_equipment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        equipment_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE leads SET assigned_equipment_id = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(equipment_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_notes<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        notes: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE leads SET notes = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(notes)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn append_status_history<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        status: LeadStatus,
        changed_by: Uuid,
        comment: Option<&str>,
    ) -> Result<LeadStatusHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, LeadStatusHistory>(
            r#"
            INSERT INTO lead_status_history (lead_id, status, changed_by, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(status)
        .bind(changed_by)
        .bind(comment)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn list_status_history(
        &self,
        lead_id: Uuid,
    ) -> Result<Vec<LeadStatusHistory>, AppError> {
        let history = sqlx::query_as::<_, LeadStatusHistory>(
            "SELECT * FROM lead_status_history WHERE lead_id = $1 ORDER BY changed_at DESC",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }
}
