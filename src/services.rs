pub mod auth_service;
pub mod catalog_service;
pub mod doctor_service;
pub mod finance_service;
pub mod lead_service;
pub mod payout_service;
pub mod reservation_service;
pub mod settlement;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use doctor_service::DoctorService;
pub use finance_service::FinanceService;
pub use lead_service::LeadService;
pub use payout_service::PayoutService;
pub use reservation_service::ReservationService;
pub use settlement::SettlementService;
