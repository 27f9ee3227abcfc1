use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DoctorRepository, PayoutRepository, UserRepository},
    models::{
        auth::Actor,
        doctor::{Doctor, DoctorDetail, DoctorStats, UpdateDoctorPayload},
    },
};

const COMMISSION_HISTORY_LIMIT: i64 = 10;

/// Decides whether a requested rate is a real change. `None` means no-op
/// (no update, no history row); out-of-range rates are rejected.
fn rate_change(current: Decimal, requested: Decimal) -> Result<Option<Decimal>, AppError> {
    if requested < Decimal::ZERO || requested > Decimal::ONE_HUNDRED {
        return Err(AppError::InvalidInput(
            "Commission rate must be between 0 and 100.".to_string(),
        ));
    }
    if requested == current {
        return Ok(None);
    }
    Ok(Some(requested))
}

#[derive(Clone)]
pub struct DoctorService {
    doctor_repo: DoctorRepository,
    user_repo: UserRepository,
    payout_repo: PayoutRepository,
}

impl DoctorService {
    pub fn new(
        doctor_repo: DoctorRepository,
        user_repo: UserRepository,
        payout_repo: PayoutRepository,
    ) -> Self {
        Self {
            doctor_repo,
            user_repo,
            payout_repo,
        }
    }

    pub async fn list_doctors(&self, actor: &Actor) -> Result<Vec<Doctor>, AppError> {
        actor.require_admin()?;
        self.doctor_repo.list().await
    }

    /// Full profile view: lead counts, lifetime earnings, the commission
    /// still owed after PAID payouts, and the recent rate-change history.
    /// Admins can view anyone; a doctor only their own profile.
    pub async fn get_doctor(
        &self,
        pool: &PgPool,
        actor: &Actor,
        doctor_id: Uuid,
    ) -> Result<DoctorDetail, AppError> {
        if !actor.is_admin() && actor.require_doctor()? != doctor_id {
            return Err(AppError::Forbidden);
        }

        let doctor = self
            .doctor_repo
            .find_by_id(pool, doctor_id)
            .await?
            .ok_or(AppError::NotFound("doctor"))?;
        let user = self
            .user_repo
            .find_by_id(doctor.user_id)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let total_leads = self.doctor_repo.count_leads(doctor_id, None).await?;
        let completed_leads = self
            .doctor_repo
            .count_leads(doctor_id, Some(&["COMPLETED", "PAYMENT_RECEIVED"]))
            .await?;
        let active_leads = self
            .doctor_repo
            .count_leads(doctor_id, Some(&["EQUIPMENT_SHIPPED", "ACTIVE_RENTAL"]))
            .await?;

        let total_earnings = self.doctor_repo.total_earnings(doctor_id).await?;
        let paid_out = self.payout_repo.sum_paid_for_doctor(doctor_id).await?;

        let commission_history = self
            .doctor_repo
            .list_commission_history(doctor_id, COMMISSION_HISTORY_LIMIT)
            .await?;

        Ok(DoctorDetail {
            name: user.name,
            email: user.email,
            stats: DoctorStats {
                total_leads,
                completed_leads,
                active_leads,
                total_earnings,
                pending_commission: total_earnings - paid_out,
            },
            commission_history,
            doctor,
        })
    }

    /// Profile edits and commission-rate changes. A rate change appends an
    /// audit row; already-settled financials keep the rate they froze at
    /// settlement time.
    pub async fn update_doctor(
        &self,
        pool: &PgPool,
        actor: &Actor,
        doctor_id: Uuid,
        payload: &UpdateDoctorPayload,
    ) -> Result<Doctor, AppError> {
        actor.require_super_admin()?;

        let mut tx = pool.begin().await?;

        let doctor = self
            .doctor_repo
            .find_by_id(&mut *tx, doctor_id)
            .await?
            .ok_or(AppError::NotFound("doctor"))?;

        self.doctor_repo
            .update_profile(
                &mut *tx,
                doctor_id,
                payload
                    .clinic_name
                    .as_deref()
                    .or(doctor.clinic_name.as_deref()),
                payload.phone.as_deref().or(doctor.phone.as_deref()),
                payload.city.as_deref().or(doctor.city.as_deref()),
                payload.notes.as_deref().or(doctor.notes.as_deref()),
            )
            .await?;

        if let Some(requested) = payload.commission_rate {
            if let Some(new_rate) = rate_change(doctor.commission_rate, requested)? {
                self.doctor_repo
                    .update_commission_rate(&mut *tx, doctor_id, new_rate)
                    .await?;

                let default_reason = format!(
                    "Commission rate updated from {}% to {}%",
                    doctor.commission_rate, new_rate
                );
                self.doctor_repo
                    .append_commission_history(
                        &mut *tx,
                        doctor_id,
                        doctor.commission_rate,
                        new_rate,
                        actor.user_id,
                        Some(payload.reason.as_deref().unwrap_or(&default_reason)),
                    )
                    .await?;

                tracing::info!(
                    doctor_id = %doctor_id,
                    old_rate = %doctor.commission_rate,
                    new_rate = %new_rate,
                    "commission rate changed"
                );
            }
        }

        tx.commit().await?;

        self.doctor_repo
            .find_by_id(pool, doctor_id)
            .await?
            .ok_or(AppError::NotFound("doctor"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_rate_is_accepted() {
        let change = rate_change(Decimal::from(15), Decimal::from(20)).unwrap();
        assert_eq!(change, Some(Decimal::from(20)));
    }

    #[test]
    fn identical_rate_is_a_no_op() {
        let change = rate_change(Decimal::from(15), Decimal::from(15)).unwrap();
        assert_eq!(change, None);
    }

    #[test]
    fn boundary_rates_are_accepted() {
        assert_eq!(
            rate_change(Decimal::from(15), Decimal::ZERO).unwrap(),
            Some(Decimal::ZERO)
        );
        assert_eq!(
            rate_change(Decimal::from(15), Decimal::ONE_HUNDRED).unwrap(),
            Some(Decimal::ONE_HUNDRED)
        );
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        assert!(rate_change(Decimal::from(15), Decimal::from(101)).is_err());
        assert!(rate_change(Decimal::from(15), Decimal::from(-1)).is_err());
    }
}
