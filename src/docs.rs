use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead,

        // --- Catalog ---
        handlers::catalog::create_city,
        handlers::catalog::list_cities,
        handlers::catalog::create_equipment,
        handlers::catalog::list_equipment,
        handlers::catalog::create_rental_price,
        handlers::catalog::list_rental_prices,

        // --- Doctors ---
        handlers::doctors::list_doctors,
        handlers::doctors::get_doctor,
        handlers::doctors::update_doctor,

        // --- Financials ---
        handlers::financials::list_financials,
        handlers::financials::get_financial,
        handlers::financials::update_financial,

        // --- Payouts ---
        handlers::payouts::create_payout,
        handlers::payouts::list_payouts,
        handlers::payouts::get_payout,
        handlers::payouts::update_payout,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterDoctorPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::LeadStatusHistory,
            models::lead::LeadDetail,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,

            // --- Catalog ---
            models::catalog::City,
            models::catalog::Equipment,
            models::catalog::EquipmentRentalPrice,
            models::catalog::ReservationKind,
            models::catalog::ReservationEvent,
            models::catalog::CreateCityPayload,
            models::catalog::CreateEquipmentPayload,
            models::catalog::CreateRentalPricePayload,

            // --- Doctors ---
            models::doctor::DoctorStatus,
            models::doctor::Doctor,
            models::doctor::CommissionHistory,
            models::doctor::DoctorStats,
            models::doctor::DoctorDetail,
            models::doctor::UpdateDoctorPayload,

            // --- Financials ---
            models::finance::PaymentStatus,
            models::finance::RentalStatus,
            models::finance::Rental,
            models::finance::Financial,
            models::finance::FinancialTotals,
            models::finance::FinancialOverview,
            models::finance::UpdateFinancialPayload,

            // --- Payouts ---
            models::payout::Payout,
            models::payout::PayoutTotals,
            models::payout::PayoutOverview,
            models::payout::CreatePayoutPayload,
            models::payout::UpdatePayoutPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "The authenticated user"),
        (name = "Leads", description = "Patient lead lifecycle"),
        (name = "Catalog", description = "Cities, equipment and per-city pricing"),
        (name = "Doctors", description = "Doctor profiles and commission rates"),
        (name = "Financials", description = "Settlement records"),
        (name = "Payouts", description = "Commission payouts")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
