use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use pix_core::models::establishment::Establishment;
use pix_core::models::pix::{NewPixRecord, PixRecord};

use crate::error::{DbError, Result};
use crate::models::entities::{
    EstablishmentEntity, EstablishmentQuery, PixCodeEntity, PixQuery,
};

/// Storage for generated codes. Rows are append-only.
#[async_trait]
pub trait PixRepository: Send + Sync {
    async fn save(&self, record: &NewPixRecord) -> Result<PixRecord>;
    async fn find_by_id(&self, id: i64) -> Result<PixRecord>;
    async fn find_by_code(&self, code: &str) -> Result<PixRecord>;
    async fn list(&self) -> Result<Vec<PixRecord>>;
}

/// An account that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewEstablishment {
    pub name: String,
    pub description: Option<String>,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait EstablishmentRepository: Send + Sync {
    /// Fails with [`DbError::Conflict`] when the email is taken.
    async fn save(&self, new: &NewEstablishment) -> Result<Establishment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Establishment>;
    async fn find_by_email(&self, email: &str) -> Result<Establishment>;
    async fn list(&self) -> Result<Vec<Establishment>>;
    async fn update(&self, establishment: &Establishment) -> Result<Establishment>;
    async fn deactivate(&self, id: Uuid) -> Result<()>;
}

pub struct PgPixRepository {
    pool: PgPool,
}

impl PgPixRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PixRepository for PgPixRepository {
    async fn save(&self, record: &NewPixRecord) -> Result<PixRecord> {
        let req = &record.request;
        let row = sqlx::query_as::<_, PixCodeEntity>(PixQuery::INSERT)
            .bind(&req.name)
            .bind(&req.key)
            .bind(&req.city)
            .bind(req.amount)
            .bind(&req.identifier)
            .bind(&req.description)
            .bind(&record.result.code)
            .bind(&record.result.qr_svg)
            .bind(&record.result.qr_png)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<PixRecord> {
        sqlx::query_as::<_, PixCodeEntity>(PixQuery::FIND_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?
            .map(Into::into)
            .ok_or_else(|| DbError::NotFound(format!("pix code {}", id)))
    }

    async fn find_by_code(&self, code: &str) -> Result<PixRecord> {
        sqlx::query_as::<_, PixCodeEntity>(PixQuery::FIND_BY_CODE)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?
            .map(Into::into)
            .ok_or_else(|| DbError::NotFound("pix code".into()))
    }

    async fn list(&self) -> Result<Vec<PixRecord>> {
        let rows = sqlx::query_as::<_, PixCodeEntity>(PixQuery::LIST)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

pub struct PgEstablishmentRepository {
    pool: PgPool,
}

impl PgEstablishmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstablishmentRepository for PgEstablishmentRepository {
    async fn save(&self, new: &NewEstablishment) -> Result<Establishment> {
        let row = sqlx::query_as::<_, EstablishmentEntity>(EstablishmentQuery::INSERT)
            .bind(Uuid::new_v4())
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(e, "email already registered"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Establishment> {
        sqlx::query_as::<_, EstablishmentEntity>(EstablishmentQuery::FIND_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?
            .map(Into::into)
            .ok_or_else(|| DbError::NotFound(format!("establishment {}", id)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Establishment> {
        sqlx::query_as::<_, EstablishmentEntity>(EstablishmentQuery::FIND_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?
            .map(Into::into)
            .ok_or_else(|| DbError::NotFound("establishment".into()))
    }

    async fn list(&self) -> Result<Vec<Establishment>> {
        let rows = sqlx::query_as::<_, EstablishmentEntity>(EstablishmentQuery::LIST)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, establishment: &Establishment) -> Result<Establishment> {
        sqlx::query_as::<_, EstablishmentEntity>(EstablishmentQuery::UPDATE)
            .bind(establishment.id)
            .bind(&establishment.name)
            .bind(&establishment.description)
            .bind(&establishment.email)
            .bind(&establishment.password_hash)
            .bind(establishment.active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(e, "email already registered"))?
            .map(Into::into)
            .ok_or_else(|| DbError::NotFound(format!("establishment {}", establishment.id)))
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(EstablishmentQuery::DEACTIVATE)
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("establishment {}", id)));
        }
        Ok(())
    }
}
