use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use pix_core::models::establishment::{
    Establishment, EstablishmentResponse, LoginRequest, LoginResponse, RegisterRequest,
};
use pix_db::{DbError, NewEstablishment};

use crate::error::{Result, ServiceError};
use crate::PixService;

const INVALID_CREDENTIALS: &str = "invalid credentials";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(ttl_hours),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

// Claims carried inside the JWT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub exp: usize,
}

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).map_err(|e| ServiceError::Internal(e.to_string()))
}

/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// bcrypt is CPU-bound; keep it off the async workers.
async fn hash_password_blocking(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
}

async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

impl PixService {
    pub async fn register(&self, req: RegisterRequest) -> Result<EstablishmentResponse> {
        req.validate()?;

        match self.establishments.find_by_email(&req.email).await {
            Ok(_) => return Err(ServiceError::Conflict("email already registered".into())),
            Err(DbError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let new = NewEstablishment {
            name: req.name,
            description: req.description,
            email: req.email,
            password_hash: hash_password_blocking(req.password, self.auth.bcrypt_cost).await?,
        };
        let saved = self.establishments.save(&new).await?;

        info!(establishment = %saved.id, "establishment registered");
        Ok(EstablishmentResponse::from(&saved))
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        req.validate()?;

        let establishment = match self.establishments.find_by_email(&req.email).await {
            Ok(e) => e,
            Err(DbError::NotFound(_)) => {
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
            Err(e) => return Err(e.into()),
        };

        if !establishment.active {
            warn!(establishment = %establishment.id, "login on deactivated account");
            return Err(ServiceError::Unauthorized("account deactivated".into()));
        }

        if !verify_password_blocking(req.password, establishment.password_hash.clone()).await? {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let token = self.issue_token(&establishment)?;
        Ok(LoginResponse {
            token,
            establishment: EstablishmentResponse::from(&establishment),
        })
    }

    pub fn issue_token(&self, establishment: &Establishment) -> Result<String> {
        let exp = (Utc::now() + self.auth.token_ttl).timestamp().max(0) as usize;
        let claims = Claims {
            sub: establishment.id,
            email: establishment.email.clone(),
            name: establishment.name.clone(),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.auth.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Checks signature, algorithm and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.auth.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {}", e)))
    }
}
