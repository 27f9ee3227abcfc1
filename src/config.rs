use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogRepository, DoctorRepository, FinanceRepository, LeadRepository, PayoutRepository,
        UserRepository,
    },
    services::{
        AuthService, CatalogService, DoctorService, FinanceService, LeadService, PayoutService,
        ReservationService, SettlementService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub catalog_service: CatalogService,
    pub doctor_service: DoctorService,
    pub finance_service: FinanceService,
    pub payout_service: PayoutService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("database connection established");

        let user_repo = UserRepository::new(db_pool.clone());
        let doctor_repo = DoctorRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let payout_repo = PayoutRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), doctor_repo.clone(), jwt_secret);
        let reservation = ReservationService::new(catalog_repo.clone());
        let settlement = SettlementService::new(
            catalog_repo.clone(),
            doctor_repo.clone(),
            finance_repo.clone(),
            reservation.clone(),
        );
        let lead_service = LeadService::new(
            lead_repo,
            catalog_repo.clone(),
            finance_repo.clone(),
            reservation,
            settlement,
        );
        let catalog_service = CatalogService::new(catalog_repo);
        let doctor_service = DoctorService::new(doctor_repo.clone(), user_repo, payout_repo.clone());
        let finance_service = FinanceService::new(finance_repo);
        let payout_service = PayoutService::new(payout_repo, doctor_repo);

        Ok(Self {
            db_pool,
            auth_service,
            lead_service,
            catalog_service,
            doctor_service,
            finance_service,
            payout_service,
        })
    }
}
