use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ---------------------------------------------------------------------------
// The Account: Establishment
// The merchant that logs in and generates codes.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Establishment {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub email: String,
    // bcrypt hash, never serialized
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(rename = "descricao", default)]
    pub description: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstablishmentResponse {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub email: String,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Establishment> for EstablishmentResponse {
    fn from(e: &Establishment) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            description: e.description.clone(),
            email: e.email.clone(),
            active: e.active,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "estabelecimento")]
    pub establishment: EstablishmentResponse,
}
