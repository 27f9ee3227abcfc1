use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");

    tracing::info!("database migrations applied");

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let lead_routes = Router::new()
        .route(
            "/",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route(
            "/{id}",
            get(handlers::leads::get_lead).patch(handlers::leads::update_lead),
        );

    let city_routes = Router::new().route(
        "/",
        post(handlers::catalog::create_city).get(handlers::catalog::list_cities),
    );

    let equipment_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_equipment).get(handlers::catalog::list_equipment),
        )
        .route(
            "/{id}/rental-prices",
            post(handlers::catalog::create_rental_price)
                .get(handlers::catalog::list_rental_prices),
        );

    let doctor_routes = Router::new()
        .route("/", get(handlers::doctors::list_doctors))
        .route(
            "/{id}",
            get(handlers::doctors::get_doctor).patch(handlers::doctors::update_doctor),
        );

    let financial_routes = Router::new()
        .route("/", get(handlers::financials::list_financials))
        .route(
            "/{id}",
            get(handlers::financials::get_financial).patch(handlers::financials::update_financial),
        );

    let payout_routes = Router::new()
        .route(
            "/",
            post(handlers::payouts::create_payout).get(handlers::payouts::list_payouts),
        )
        .route(
            "/{id}",
            get(handlers::payouts::get_payout).patch(handlers::payouts::update_payout),
        );

    // Everything except registration, login and the health check requires a
    // valid bearer token.
    let protected_routes = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/cities", city_routes)
        .nest("/api/equipment", equipment_routes)
        .nest("/api/doctors", doctor_routes)
        .nest("/api/financials", financial_routes)
        .nest("/api/payouts", payout_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await.expect("server error");
}
