use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, FinanceRepository, LeadRepository},
    models::{
        auth::Actor,
        lead::{CreateLeadPayload, Lead, LeadDetail, LeadStatus, UpdateLeadPayload},
    },
    services::{reservation_service::ReservationService, settlement::SettlementService},
};

/// Equipment to give back when a lead is cancelled or fails. A settled lead
/// already released its unit at settlement; releasing again would free a
/// unit some other lead may be holding on the same pricing row.
fn unit_to_release(assigned_equipment_id: Option<Uuid>, settled: bool) -> Option<Uuid> {
    if settled { None } else { assigned_equipment_id }
}

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    catalog_repo: CatalogRepository,
    finance_repo: FinanceRepository,
    reservation: ReservationService,
    settlement: SettlementService,
}

impl LeadService {
    pub fn new(
        lead_repo: LeadRepository,
        catalog_repo: CatalogRepository,
        finance_repo: FinanceRepository,
        reservation: ReservationService,
        settlement: SettlementService,
    ) -> Self {
        Self {
            lead_repo,
            catalog_repo,
            finance_repo,
            reservation,
            settlement,
        }
    }

    /// Doctors submit leads for their own profile only. The free-text city
    /// must match a known City row; unknown cities are rejected up front so
    /// settlement never has to guess later.
    pub async fn create_lead(
        &self,
        pool: &PgPool,
        actor: &Actor,
        payload: &CreateLeadPayload,
    ) -> Result<Lead, AppError> {
        let doctor_id = actor.require_doctor()?;

        let city = self
            .catalog_repo
            .find_city_by_name(pool, &payload.city)
            .await?
            .ok_or(AppError::NotFound("city"))?;

        let lead = self
            .lead_repo
            .create_lead(
                pool,
                doctor_id,
                &payload.patient_name,
                &payload.parent_name,
                &payload.parent_email,
                &payload.patient_phone,
                &payload.patient_location,
                city.id,
                payload.notes.as_deref(),
            )
            .await?;

        tracing::info!(lead_id = %lead.id, doctor_id = %doctor_id, "lead created");
        Ok(lead)
    }

    /// Doctors see their own leads; admins see everything.
    pub async fn list_leads(
        &self,
        actor: &Actor,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>, AppError> {
        if actor.is_admin() {
            return self.lead_repo.list_all(status).await;
        }
        let doctor_id = actor.require_doctor()?;
        self.lead_repo.list_by_doctor(doctor_id, status).await
    }

    pub async fn get_lead(
        &self,
        pool: &PgPool,
        actor: &Actor,
        lead_id: Uuid,
    ) -> Result<LeadDetail, AppError> {
        let lead = self
            .lead_repo
            .find_by_id(pool, lead_id)
            .await?
            .ok_or(AppError::NotFound("lead"))?;

        if !actor.is_admin() {
            let doctor_id = actor.require_doctor()?;
            if lead.doctor_id != doctor_id {
                return Err(AppError::Forbidden);
            }
        }

        let status_history = self.lead_repo.list_status_history(lead_id).await?;
        let reservation_events = self.catalog_repo.list_reservation_events(lead_id).await?;
        let rental = self.finance_repo.find_rental_by_lead(pool, lead_id).await?;
        let financial = self
            .finance_repo
            .find_financial_by_lead(pool, lead_id)
            .await?;

        Ok(LeadDetail {
            lead,
            status_history,
            reservation_events,
            rental,
            financial,
        })
    }

    /// The admin workhorse: equipment assignment, status transition and
    /// settlement all happen here, inside one transaction. If anything
    /// fails, the lead keeps its prior status and no counter, history row
    /// or financial record survives.
    pub async fn update_lead(
        &self,
        pool: &PgPool,
        actor: &Actor,
        lead_id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        actor.require_admin()?;

        let mut tx = pool.begin().await?;

        // Row lock: concurrent updates to the same lead serialize here.
        let mut lead = self
            .lead_repo
            .find_by_id_for_update(&mut *tx, lead_id)
            .await?
            .ok_or(AppError::NotFound("lead"))?;

        if let Some(equipment_id) = payload.assigned_equipment_id {
            self.reservation
                .assign(&mut tx, &lead, equipment_id)
                .await?;
            self.lead_repo
                .set_assigned_equipment(&mut *tx, lead_id, Some(equipment_id))
                .await?;
            lead.assigned_equipment_id = Some(equipment_id);
        }

        if let Some(new_status) = payload.status {
            if new_status != lead.status {
                if !lead.status.can_transition_to(new_status) {
                    return Err(AppError::InvalidTransition {
                        from: lead.status,
                        to: new_status,
                    });
                }

                // Settlement must succeed before any history row is written.
                if new_status.is_closing() {
                    self.settlement
                        .settle(
                            &mut tx,
                            &lead,
                            new_status,
                            payload.days_used,
                            payload.shipping_cost,
                        )
                        .await?;

                    // Settlement released the unit; clear the assignment so
                    // no later transition can release it a second time.
                    if lead.assigned_equipment_id.is_some() {
                        self.lead_repo
                            .set_assigned_equipment(&mut *tx, lead_id, None)
                            .await?;
                        lead.assigned_equipment_id = None;
                    }
                }

                // A lead abandoned mid-rental must give its unit back.
                if matches!(new_status, LeadStatus::Cancelled | LeadStatus::Failed) {
                    let settled = self
                        .finance_repo
                        .find_financial_by_lead(&mut *tx, lead_id)
                        .await?
                        .is_some();
                    if let Some(equipment_id) =
                        unit_to_release(lead.assigned_equipment_id, settled)
                    {
                        self.reservation
                            .release(&mut tx, lead.id, equipment_id, lead.city_id)
                            .await?;
                    }
                }

                self.lead_repo
                    .append_status_history(
                        &mut *tx,
                        lead_id,
                        new_status,
                        actor.user_id,
                        payload.comment.as_deref(),
                    )
                    .await?;
                self.lead_repo
                    .update_status(&mut *tx, lead_id, new_status)
                    .await?;

                tracing::info!(
                    lead_id = %lead_id,
                    from = %lead.status,
                    to = %new_status,
                    "lead status changed"
                );
            }
        }

        if let Some(notes) = payload.notes.as_deref() {
            self.lead_repo
                .update_notes(&mut *tx, lead_id, Some(notes))
                .await?;
        }

        tx.commit().await?;

        self.lead_repo
            .find_by_id(pool, lead_id)
            .await?
            .ok_or(AppError::NotFound("lead"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelling_an_unsettled_lead_releases_its_unit() {
        let equipment_id = Uuid::new_v4();
        assert_eq!(
            unit_to_release(Some(equipment_id), false),
            Some(equipment_id)
        );
    }

    #[test]
    fn cancelling_a_settled_lead_releases_nothing() {
        // The unit went back to the pool at settlement. A second release on
        // COMPLETED -> CANCELLED would hand out more units than the pool
        // holds once another lead reserves on the same pricing row.
        let equipment_id = Uuid::new_v4();
        assert_eq!(unit_to_release(Some(equipment_id), true), None);
    }

    #[test]
    fn cancelling_without_an_assignment_releases_nothing() {
        assert_eq!(unit_to_release(None, false), None);
        assert_eq!(unit_to_release(None, true), None);
    }
}
