pub mod catalog_repo;
pub mod doctor_repo;
pub mod finance_repo;
pub mod lead_repo;
pub mod payout_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use doctor_repo::DoctorRepository;
pub use finance_repo::FinanceRepository;
pub use lead_repo::LeadRepository;
pub use payout_repo::PayoutRepository;
pub use user_repo::UserRepository;
