use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Validates the bearer token and stashes both the user row and the
/// request-scoped `Actor` into the request extensions.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;
            let actor = app_state.auth_service.actor_for(&user).await?;

            request.extensions_mut().insert(user);
            request.extensions_mut().insert(actor);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extractor for the authenticated user row.
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

impl<S> FromRequestParts<S> for crate::models::auth::Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<crate::models::auth::Actor>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
