// Settlement: the financial close-out of a lead. The arithmetic is a pure
// function so it can be tested in isolation; `settle` wires it to the
// database inside the caller's transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, DoctorRepository, FinanceRepository},
    models::{
        finance::{Financial, PaymentStatus, RentalStatus},
        lead::{Lead, LeadStatus},
    },
    services::reservation_service::ReservationService,
};

/// Flat 18% GST applied to rental + shipping.
fn gst_rate() -> Decimal {
    Decimal::new(18, 2)
}

/// Validates the closing payload before anything is written: equipment must
/// be assigned, the day count positive, shipping non-negative (absent
/// shipping counts as zero).
fn closing_inputs(
    assigned_equipment_id: Option<Uuid>,
    days_used: Option<i32>,
    shipping_cost: Option<Decimal>,
) -> Result<(Uuid, i32, Decimal), AppError> {
    let equipment_id = assigned_equipment_id.ok_or_else(|| {
        AppError::InvalidInput("A lead cannot be closed without assigned equipment.".to_string())
    })?;

    let days_used = days_used.ok_or_else(|| {
        AppError::InvalidInput("daysUsed is required when closing a lead.".to_string())
    })?;
    if days_used <= 0 {
        return Err(AppError::InvalidInput(
            "daysUsed must be a positive number of days.".to_string(),
        ));
    }

    let shipping_cost = shipping_cost.unwrap_or(Decimal::ZERO);
    if shipping_cost < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "shippingCost cannot be negative.".to_string(),
        ));
    }

    Ok((equipment_id, days_used, shipping_cost))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementBreakdown {
    pub rental_amount: Decimal,
    pub shipping_cost: Decimal,
    pub gst_amount: Decimal,
    pub base_amount: Decimal,
    pub commission_rate_applied: Decimal,
    pub doctor_commission: Decimal,
    pub net_profit: Decimal,
}

/// The one commission formula used everywhere: commission is a percentage
/// of the raw rental amount. GST is computed on rental + shipping but does
/// not reduce the commission base.
pub fn calculate(
    price_per_day: Decimal,
    days_used: i32,
    shipping_cost: Decimal,
    commission_rate: Decimal,
) -> SettlementBreakdown {
    let rental_amount = Decimal::from(days_used) * price_per_day;
    let base_amount = rental_amount + shipping_cost;
    let gst_amount = base_amount * gst_rate();
    let doctor_commission = rental_amount * commission_rate / Decimal::ONE_HUNDRED;
    let net_profit = rental_amount - doctor_commission;

    SettlementBreakdown {
        rental_amount,
        shipping_cost,
        gst_amount,
        base_amount,
        commission_rate_applied: commission_rate,
        doctor_commission,
        net_profit,
    }
}

#[derive(Clone)]
pub struct SettlementService {
    catalog_repo: CatalogRepository,
    doctor_repo: DoctorRepository,
    finance_repo: FinanceRepository,
    reservation: ReservationService,
}

impl SettlementService {
    pub fn new(
        catalog_repo: CatalogRepository,
        doctor_repo: DoctorRepository,
        finance_repo: FinanceRepository,
        reservation: ReservationService,
    ) -> Self {
        Self {
            catalog_repo,
            doctor_repo,
            finance_repo,
            reservation,
        }
    }

    /// Closes out a lead. Runs inside the caller's transaction together with
    /// the status update and the history append; nothing here commits.
    ///
    /// The first close computes and persists the breakdown and releases the
    /// inventory reservation. A later COMPLETED -> PAYMENT_RECEIVED step only
    /// flips the financial record to PAID; the frozen numbers are never
    /// recomputed and the counter is never decremented twice.
    pub async fn settle(
        &self,
        conn: &mut PgConnection,
        lead: &Lead,
        closing_status: LeadStatus,
        days_used: Option<i32>,
        shipping_cost: Option<Decimal>,
    ) -> Result<Financial, AppError> {
        if let Some(existing) = self
            .finance_repo
            .find_financial_by_lead(&mut *conn, lead.id)
            .await?
        {
            // Already settled: the only thing left to record is the payment.
            if closing_status == LeadStatus::PaymentReceived
                && existing.payment_status != PaymentStatus::Paid
            {
                return self
                    .finance_repo
                    .update_payment_status(
                        &mut *conn,
                        existing.id,
                        PaymentStatus::Paid,
                        Some(Utc::now()),
                    )
                    .await;
            }
            return Ok(existing);
        }

        let (equipment_id, days_used, shipping_cost) =
            closing_inputs(lead.assigned_equipment_id, days_used, shipping_cost)?;

        let price = self
            .catalog_repo
            .find_price(&mut *conn, equipment_id, lead.city_id)
            .await?
            .ok_or(AppError::NotFound("rental price"))?;

        let doctor = self
            .doctor_repo
            .find_by_id(&mut *conn, lead.doctor_id)
            .await?
            .ok_or(AppError::NotFound("doctor"))?;

        let breakdown = calculate(
            price.price_per_day,
            days_used,
            shipping_cost,
            doctor.commission_rate,
        );

        let now = Utc::now();
        let (payment_status, payment_received_date) =
            if closing_status == LeadStatus::PaymentReceived {
                (PaymentStatus::Paid, Some(now))
            } else {
                (PaymentStatus::Pending, None)
            };

        self.finance_repo
            .upsert_rental(
                &mut *conn,
                lead.id,
                equipment_id,
                days_used,
                now,
                RentalStatus::Completed,
            )
            .await?;

        let financial = self
            .finance_repo
            .upsert_financial(
                &mut *conn,
                lead.id,
                breakdown.rental_amount,
                breakdown.shipping_cost,
                breakdown.gst_amount,
                breakdown.base_amount,
                breakdown.commission_rate_applied,
                breakdown.doctor_commission,
                breakdown.net_profit,
                payment_status,
                payment_received_date,
            )
            .await?;

        self.reservation
            .release(&mut *conn, lead.id, equipment_id, lead.city_id)
            .await?;

        tracing::info!(
            lead_id = %lead.id,
            rental_amount = %breakdown.rental_amount,
            doctor_commission = %breakdown.doctor_commission,
            net_profit = %breakdown.net_profit,
            "lead settled"
        );

        Ok(financial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mumbai_scenario() {
        // 1000/day for 3 days, shipping 100, 15% commission.
        let b = calculate(dec!(1000), 3, dec!(100), dec!(15));
        assert_eq!(b.rental_amount, dec!(3000));
        assert_eq!(b.base_amount, dec!(3100));
        assert_eq!(b.gst_amount, dec!(558.00));
        assert_eq!(b.doctor_commission, dec!(450));
        assert_eq!(b.net_profit, dec!(2550));
        assert_eq!(b.commission_rate_applied, dec!(15));
    }

    #[test]
    fn zero_commission_rate_keeps_full_profit() {
        let b = calculate(dec!(500), 4, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(b.rental_amount, dec!(2000));
        assert_eq!(b.doctor_commission, Decimal::ZERO);
        assert_eq!(b.net_profit, dec!(2000));
    }

    #[test]
    fn commission_is_computed_on_rental_amount_not_gst_base() {
        // Shipping inflates the GST base but never the commission.
        let with_shipping = calculate(dec!(1000), 2, dec!(500), dec!(10));
        let without_shipping = calculate(dec!(1000), 2, Decimal::ZERO, dec!(10));
        assert_eq!(
            with_shipping.doctor_commission,
            without_shipping.doctor_commission
        );
        assert_eq!(with_shipping.doctor_commission, dec!(200));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let a = calculate(dec!(1234.56), 7, dec!(89.90), dec!(12.5));
        let b = calculate(dec!(1234.56), 7, dec!(89.90), dec!(12.5));
        assert_eq!(a, b);
    }

    #[test]
    fn closing_without_equipment_is_rejected() {
        let result = closing_inputs(None, Some(3), Some(dec!(100)));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn closing_requires_a_positive_day_count() {
        let equipment = Some(Uuid::new_v4());
        assert!(closing_inputs(equipment, None, None).is_err());
        assert!(closing_inputs(equipment, Some(0), None).is_err());
        assert!(closing_inputs(equipment, Some(-2), None).is_err());
    }

    #[test]
    fn closing_rejects_negative_shipping_and_defaults_absent_to_zero() {
        let equipment = Some(Uuid::new_v4());
        assert!(closing_inputs(equipment, Some(3), Some(dec!(-1))).is_err());

        let (_, days, shipping) = closing_inputs(equipment, Some(3), None).unwrap();
        assert_eq!(days, 3);
        assert_eq!(shipping, Decimal::ZERO);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            fn arb_money(max_units: i64)(units in 0..max_units, cents in 0..100i64) -> Decimal {
                Decimal::new(units * 100 + cents, 2)
            }
        }

        prop_compose! {
            // Whole-percent rates, 0 through 100.
            fn arb_rate()(rate in 0..=100i64) -> Decimal {
                Decimal::from(rate)
            }
        }

        proptest! {
            #[test]
            fn commission_and_profit_sum_to_rental(
                price in arb_money(10_000),
                days in 1..365i32,
                shipping in arb_money(1_000),
                rate in arb_rate(),
            ) {
                let b = calculate(price, days, shipping, rate);
                prop_assert_eq!(b.doctor_commission + b.net_profit, b.rental_amount);
            }

            #[test]
            fn gst_is_18_percent_of_base(
                price in arb_money(10_000),
                days in 1..365i32,
                shipping in arb_money(1_000),
                rate in arb_rate(),
            ) {
                let b = calculate(price, days, shipping, rate);
                prop_assert_eq!(b.base_amount, b.rental_amount + b.shipping_cost);
                prop_assert_eq!(b.gst_amount, b.base_amount * Decimal::new(18, 2));
            }

            #[test]
            fn commission_never_exceeds_rental(
                price in arb_money(10_000),
                days in 1..365i32,
                shipping in arb_money(1_000),
                rate in arb_rate(),
            ) {
                let b = calculate(price, days, shipping, rate);
                prop_assert!(b.doctor_commission >= Decimal::ZERO);
                prop_assert!(b.doctor_commission <= b.rental_amount);
            }

            #[test]
            fn commission_scales_linearly_with_days(
                price in arb_money(10_000),
                days in 1..180i32,
                rate in arb_rate(),
            ) {
                let one = calculate(price, days, Decimal::ZERO, rate);
                let two = calculate(price, days * 2, Decimal::ZERO, rate);
                prop_assert_eq!(two.doctor_commission, one.doctor_commission * Decimal::from(2));
            }
        }
    }
}
