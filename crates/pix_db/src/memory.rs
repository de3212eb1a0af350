//! In-process repositories with the same contracts as the Postgres ones.
//! Used by tests and by tools that run without a database.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use pix_core::models::establishment::Establishment;
use pix_core::models::pix::{NewPixRecord, PixRecord};

use crate::error::{DbError, Result};
use crate::repository::{EstablishmentRepository, NewEstablishment, PixRepository};

fn poisoned<T>(_: T) -> DbError {
    DbError::Database("lock poisoned".into())
}

#[derive(Default)]
pub struct MemoryPixRepository {
    rows: RwLock<Vec<PixRecord>>,
}

impl MemoryPixRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PixRepository for MemoryPixRepository {
    async fn save(&self, record: &NewPixRecord) -> Result<PixRecord> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let req = &record.request;
        let row = PixRecord {
            id: rows.len() as i64 + 1,
            name: req.name.clone(),
            key: req.key.clone(),
            city: req.city.clone(),
            amount: req.amount,
            identifier: req.identifier.clone(),
            description: req.description.clone(),
            code: record.result.code.clone(),
            qr_svg: record.result.qr_svg.clone(),
            qr_png: record.result.qr_png.clone(),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<PixRecord> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("pix code {}", id)))
    }

    async fn find_by_code(&self, code: &str) -> Result<PixRecord> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.iter()
            .find(|r| r.code == code)
            .cloned()
            .ok_or_else(|| DbError::NotFound("pix code".into()))
    }

    async fn list(&self) -> Result<Vec<PixRecord>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().rev().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryEstablishmentRepository {
    rows: RwLock<Vec<Establishment>>,
}

impl MemoryEstablishmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EstablishmentRepository for MemoryEstablishmentRepository {
    async fn save(&self, new: &NewEstablishment) -> Result<Establishment> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.iter().any(|e| e.email == new.email) {
            return Err(DbError::Conflict("email already registered".into()));
        }
        let now = Utc::now();
        let row = Establishment {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Establishment> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound(format!("establishment {}", id)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Establishment> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.iter()
            .find(|e| e.email == email)
            .cloned()
            .ok_or_else(|| DbError::NotFound("establishment".into()))
    }

    async fn list(&self) -> Result<Vec<Establishment>> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut all = rows.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update(&self, establishment: &Establishment) -> Result<Establishment> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows
            .iter()
            .any(|e| e.email == establishment.email && e.id != establishment.id)
        {
            return Err(DbError::Conflict("email already registered".into()));
        }
        let row = rows
            .iter_mut()
            .find(|e| e.id == establishment.id)
            .ok_or_else(|| DbError::NotFound(format!("establishment {}", establishment.id)))?;
        *row = Establishment { updated_at: Utc::now(), ..establishment.clone() };
        Ok(row.clone())
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DbError::NotFound(format!("establishment {}", id)))?;
        row.active = false;
        row.updated_at = Utc::now();
        Ok(())
    }
}
