use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle of a patient lead. The happy path runs top to bottom;
/// CANCELLED and FAILED are reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    NewLead,
    Contacted,
    EquipmentShipped,
    ActiveRental,
    Completed,
    PaymentReceived,
    Cancelled,
    Failed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::NewLead => "NEW_LEAD",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::EquipmentShipped => "EQUIPMENT_SHIPPED",
            LeadStatus::ActiveRental => "ACTIVE_RENTAL",
            LeadStatus::Completed => "COMPLETED",
            LeadStatus::PaymentReceived => "PAYMENT_RECEIVED",
            LeadStatus::Cancelled => "CANCELLED",
            LeadStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LeadStatus::PaymentReceived | LeadStatus::Cancelled | LeadStatus::Failed
        )
    }

    /// Statuses that close the rental and require settlement.
    pub fn is_closing(&self) -> bool {
        matches!(self, LeadStatus::Completed | LeadStatus::PaymentReceived)
    }

    /// Statuses in which equipment may still be assigned or swapped. Once a
    /// lead closes, its reservation has been released and must stay released.
    pub fn accepts_equipment(&self) -> bool {
        matches!(
            self,
            LeadStatus::NewLead
                | LeadStatus::Contacted
                | LeadStatus::EquipmentShipped
                | LeadStatus::ActiveRental
        )
    }

    /// The next step on the happy path, if any.
    fn next(&self) -> Option<LeadStatus> {
        match self {
            LeadStatus::NewLead => Some(LeadStatus::Contacted),
            LeadStatus::Contacted => Some(LeadStatus::EquipmentShipped),
            LeadStatus::EquipmentShipped => Some(LeadStatus::ActiveRental),
            LeadStatus::ActiveRental => Some(LeadStatus::Completed),
            LeadStatus::Completed => Some(LeadStatus::PaymentReceived),
            _ => None,
        }
    }

    /// Enforced transition graph: one step forward on the happy path, or a
    /// branch to CANCELLED/FAILED from any non-terminal state. Skipping
    /// steps is rejected.
    pub fn can_transition_to(&self, new: LeadStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match new {
            LeadStatus::Cancelled | LeadStatus::Failed => true,
            _ => self.next() == Some(new),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_name: String,
    pub parent_name: String,
    pub parent_email: String,
    pub patient_phone: String,
    pub patient_location: String,
    pub city_id: Uuid,
    pub status: LeadStatus,
    pub assigned_equipment_id: Option<Uuid>,
    pub notes: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Append-only audit trail of status changes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusHistory {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub status: LeadStatus,
    pub changed_by: Uuid,
    pub comment: Option<String>,
    pub changed_at: DateTime<Utc>,
}

// Doctor-submitted referral form. The city arrives as free text and is
// resolved to a City row once, at creation time.
#[derive(Debug, serde::Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "Patient name is required."))]
    pub patient_name: String,
    #[validate(length(min = 1, message = "Parent name is required."))]
    pub parent_name: String,
    #[validate(email(message = "Parent email is invalid."))]
    pub parent_email: String,
    #[validate(length(min = 1, message = "Phone is required."))]
    pub patient_phone: String,
    #[validate(length(min = 1, message = "Location is required."))]
    pub patient_location: String,
    #[validate(length(min = 1, message = "City is required."))]
    pub city: String,
    pub notes: Option<String>,
}

// Admin-side lead update: any combination of a status transition, an
// equipment assignment and a notes edit. days_used/shipping_cost feed
// settlement when the new status closes the lead.
#[derive(Debug, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub status: Option<LeadStatus>,
    pub comment: Option<String>,
    pub notes: Option<String>,
    pub assigned_equipment_id: Option<Uuid>,
    pub days_used: Option<i32>,
    pub shipping_cost: Option<rust_decimal::Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    pub lead: Lead,
    pub status_history: Vec<LeadStatusHistory>,
    pub reservation_events: Vec<crate::models::catalog::ReservationEvent>,
    pub rental: Option<crate::models::finance::Rental>,
    pub financial: Option<crate::models::finance::Financial>,
}

#[cfg(test)]
mod tests {
    use super::LeadStatus::*;

    #[test]
    fn happy_path_is_accepted_step_by_step() {
        let path = [
            NewLead,
            Contacted,
            EquipmentShipped,
            ActiveRental,
            Completed,
            PaymentReceived,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn skipping_steps_is_rejected() {
        assert!(!NewLead.can_transition_to(EquipmentShipped));
        assert!(!NewLead.can_transition_to(Completed));
        assert!(!Contacted.can_transition_to(ActiveRental));
        assert!(!ActiveRental.can_transition_to(PaymentReceived));
    }

    #[test]
    fn moving_backwards_is_rejected() {
        assert!(!Contacted.can_transition_to(NewLead));
        assert!(!Completed.can_transition_to(ActiveRental));
    }

    #[test]
    fn failure_branches_reachable_from_any_non_terminal_state() {
        for status in [NewLead, Contacted, EquipmentShipped, ActiveRental, Completed] {
            assert!(status.can_transition_to(Cancelled));
            assert!(status.can_transition_to(Failed));
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for terminal in [PaymentReceived, Cancelled, Failed] {
            for target in [
                NewLead,
                Contacted,
                EquipmentShipped,
                ActiveRental,
                Completed,
                PaymentReceived,
                Cancelled,
                Failed,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn closing_statuses() {
        assert!(Completed.is_closing());
        assert!(PaymentReceived.is_closing());
        assert!(!ActiveRental.is_closing());
        assert!(!Cancelled.is_closing());
    }

    #[test]
    fn equipment_can_only_be_assigned_before_closure() {
        for status in [NewLead, Contacted, EquipmentShipped, ActiveRental] {
            assert!(status.accepts_equipment());
        }
        for status in [Completed, PaymentReceived, Cancelled, Failed] {
            assert!(!status.accepts_equipment());
        }
    }
}
