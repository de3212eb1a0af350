//! Key-value cache for download artifacts.
//!
//! Entries are derived from stored records and never mutated, so a plain
//! TTL store is enough: last write wins and any failure is a miss.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use pix_core::models::pix::PixRecord;

pub const KEY_PREFIX: &str = "pix_qrcode:";
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache codec error: {0}")]
    Codec(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Codec(e.to_string())
    }
}

#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

pub async fn get_object<T: DeserializeOwned>(
    cache: &dyn CacheAdapter,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match cache.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub async fn set_object<T: Serialize + Sync>(
    cache: &dyn CacheAdapter,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<(), CacheError> {
    let bytes = serde_json::to_vec(value)?;
    cache.set(key, &bytes, ttl).await
}

/// `pix_qrcode:<code>` or `pix_qrcode:<code>:<template>`.
pub fn cache_key(code: &str, template: Option<&str>) -> String {
    match template {
        Some(name) if !name.is_empty() => format!("{}{}:{}", KEY_PREFIX, code, name),
        _ => format!("{}{}", KEY_PREFIX, code),
    }
}

/// What a download needs: the stored record and its decoded PNG.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedPix {
    pub pix: PixRecord,
    #[serde(with = "png_base64", default)]
    pub png_data: Vec<u8>,
}

mod png_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Redis
// ---------------------------------------------------------------------------
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheAdapter for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-process
// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (Vec<u8>, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().await.values().filter(|(_, exp)| *exp > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheAdapter for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value.to_vec(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record() -> PixRecord {
        PixRecord {
            id: 1,
            name: "LOJA".into(),
            key: "k@x.com".into(),
            city: "RECIFE".into(),
            amount: None,
            identifier: None,
            description: None,
            code: "000201".into(),
            qr_svg: "<svg/>".into(),
            qr_png: "data:image/png;base64,AQID".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn key_scheme() {
        assert_eq!(cache_key("0002ABC", None), "pix_qrcode:0002ABC");
        assert_eq!(cache_key("0002ABC", Some("")), "pix_qrcode:0002ABC");
        assert_eq!(
            cache_key("0002ABC", Some("template_pix_1")),
            "pix_qrcode:0002ABC:template_pix_1"
        );
    }

    #[tokio::test]
    async fn objects_round_trip_with_png_as_base64() {
        let cache = MemoryCache::new();
        let entry = CachedPix { pix: record(), png_data: vec![1, 2, 3] };
        set_object(&cache, "k", &entry, DEFAULT_TTL).await.unwrap();

        let raw = cache.get("k").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["png_data"], "AQID");

        let back: CachedPix = get_object(&cache, "k").await.unwrap().unwrap();
        assert_eq!(back, entry);
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let cache = MemoryCache::new();
        cache.set("k", b"v", Duration::from_millis(20)).await.unwrap();
        assert!(cache.get("k").await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn delete_and_garbage() {
        let cache = MemoryCache::new();
        cache.set("k", b"not json", DEFAULT_TTL).await.unwrap();
        assert!(matches!(
            get_object::<CachedPix>(&cache, "k").await,
            Err(CacheError::Codec(_))
        ));
        cache.delete("k").await.unwrap();
        assert!(get_object::<CachedPix>(&cache, "k").await.unwrap().is_none());
    }
}
