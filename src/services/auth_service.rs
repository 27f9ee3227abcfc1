use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{DoctorRepository, UserRepository},
    models::auth::{Actor, Claims, LoginPayload, RegisterDoctorPayload, Role, User},
};

const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    doctor_repo: DoctorRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, doctor_repo: DoctorRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            doctor_repo,
            jwt_secret,
        }
    }

    /// Creates the user account and its doctor profile in one transaction.
    /// New doctors start at the default commission rate of 15%.
    pub async fn register_doctor(
        &self,
        pool: &PgPool,
        payload: RegisterDoctorPayload,
    ) -> Result<String, AppError> {
        let password_hash = hash_password(payload.password).await?;

        let mut tx = pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.name,
                &payload.email,
                payload.phone.as_deref(),
                &password_hash,
                Role::Doctor,
            )
            .await?;

        self.doctor_repo
            .create_doctor(
                &mut *tx,
                user.id,
                payload.clinic_name.as_deref(),
                payload.phone.as_deref(),
                payload.city.as_deref(),
                Decimal::from(15),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user.id, "doctor registered");
        self.create_token(&user)
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify_password(payload.password, user.password_hash.clone()).await?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&user)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Resolves a bearer token to the user it was issued for.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    /// Builds the request-scoped caller identity. For doctors this also
    /// resolves the doctor profile id, which scopes all of their queries.
    pub async fn actor_for(&self, user: &User) -> Result<Actor, AppError> {
        let doctor_id = match user.role {
            Role::Doctor => {
                let doctor = self
                    .doctor_repo
                    .find_by_user_id(user.id)
                    .await?
                    .ok_or(AppError::Forbidden)?;
                Some(doctor.id)
            }
            _ => None,
        };

        Ok(Actor {
            user_id: user.id,
            role: user.role,
            doctor_id,
        })
    }
}

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_password(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))??;
    Ok(valid)
}
