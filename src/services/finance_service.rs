use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::{
        auth::Actor,
        finance::{Financial, FinancialOverview, FinancialTotals, PaymentStatus},
    },
};

#[derive(Clone)]
pub struct FinanceService {
    finance_repo: FinanceRepository,
}

impl FinanceService {
    pub fn new(finance_repo: FinanceRepository) -> Self {
        Self { finance_repo }
    }

    /// Admin overview: settlement records plus the running totals the
    /// dashboard shows. Revenue is rental income; expenses are shipping
    /// and GST remitted.
    pub async fn list_financials(
        &self,
        actor: &Actor,
        status: Option<PaymentStatus>,
    ) -> Result<FinancialOverview, AppError> {
        actor.require_admin()?;

        let financials = self.finance_repo.list_financials(status).await?;

        let mut totals = FinancialTotals {
            total_revenue: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            total_commission: Decimal::ZERO,
            total_profit: Decimal::ZERO,
        };
        for f in &financials {
            totals.total_revenue += f.rental_amount;
            totals.total_expenses += f.shipping_cost + f.gst_amount;
            totals.total_commission += f.doctor_commission;
            totals.total_profit += f.net_profit;
        }

        Ok(FinancialOverview { financials, totals })
    }

    pub async fn get_financial(&self, actor: &Actor, id: Uuid) -> Result<Financial, AppError> {
        actor.require_admin()?;
        self.finance_repo
            .find_financial(id)
            .await?
            .ok_or(AppError::NotFound("financial record"))
    }

    /// Flips the payment status without recomputing any amounts. Marking
    /// PAID stamps the received date once; moving away from PAID clears it.
    pub async fn update_payment_status(
        &self,
        pool: &PgPool,
        actor: &Actor,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<Financial, AppError> {
        actor.require_admin()?;

        let financial = self
            .finance_repo
            .find_financial(id)
            .await?
            .ok_or(AppError::NotFound("financial record"))?;

        let payment_received_date = match status {
            PaymentStatus::Paid => financial.payment_received_date.or_else(|| Some(Utc::now())),
            _ => None,
        };

        let updated = self
            .finance_repo
            .update_payment_status(pool, id, status, payment_received_date)
            .await?;

        tracing::info!(financial_id = %id, status = ?status, "payment status updated");
        Ok(updated)
    }
}
