use tracing::{debug, warn};

use pix_core::models::pix::PixResult;
use pix_core::render::decode_png_data_uri;

use crate::cache::{cache_key, get_object, set_object, CachedPix, DEFAULT_TTL};
use crate::error::{Result, ServiceError};
use crate::PixService;

pub const QR_FILENAME: &str = "pix_qrcode.png";
pub const TEMPLATE_FILENAME: &str = "pix_template.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadFormat {
    Json,
    #[default]
    Png,
}

impl DownloadFormat {
    /// Anything other than `json` means PNG.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => DownloadFormat::Json,
            _ => DownloadFormat::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Download {
    Json(PixResult),
    Png { filename: &'static str, data: Vec<u8> },
}

impl PixService {
    /// Serves a previously generated code, looked up by exact payload match.
    pub async fn download(
        &self,
        code: &str,
        format: DownloadFormat,
        template: Option<&str>,
    ) -> Result<Download> {
        if code.is_empty() {
            return Err(ServiceError::Validation("codigo_pix is required".into()));
        }
        let template = template.filter(|t| !t.is_empty());
        if let Some(name) = template {
            if self.compositor.registry().get(name).is_none() {
                return Err(ServiceError::NotFound(format!("template {}", name)));
            }
        }

        let cached = self.load_cached(code, template).await?;

        if format == DownloadFormat::Json {
            return Ok(Download::Json(cached.pix.result()));
        }

        match template {
            Some(name) => {
                let data = self.compositor.apply(&cached.png_data, name)?;
                Ok(Download::Png { filename: TEMPLATE_FILENAME, data })
            }
            None => Ok(Download::Png { filename: QR_FILENAME, data: cached.png_data }),
        }
    }

    async fn load_cached(&self, code: &str, template: Option<&str>) -> Result<CachedPix> {
        let key = cache_key(code, template);

        match get_object::<CachedPix>(self.cache.as_ref(), &key).await {
            Ok(Some(hit)) => {
                debug!(key = %key, "cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "cache read failed, falling back to store"),
        }

        let pix = self.pix_repo.find_by_code(code).await?;
        let png_data = decode_png_data_uri(&pix.qr_png)
            .map_err(|e| ServiceError::Internal(format!("stored QR code is unreadable: {}", e)))?;
        let entry = CachedPix { pix, png_data };

        if let Err(e) = set_object(self.cache.as_ref(), &key, &entry, DEFAULT_TTL).await {
            warn!(key = %key, error = %e, "cache write failed");
        }
        Ok(entry)
    }
}
