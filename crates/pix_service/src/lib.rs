pub mod auth;
pub mod cache;
pub mod download;
pub mod error;
pub mod generate;

use std::sync::Arc;

use pix_core::render::{QrRenderer, TemplateCompositor};
use pix_db::{EstablishmentRepository, PixRepository};

pub use auth::{AuthConfig, Claims};
pub use cache::{CacheAdapter, MemoryCache, RedisCache};
pub use download::{Download, DownloadFormat};
pub use error::{Result, ServiceError};

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct PixService {
    pub pix_repo: Arc<dyn PixRepository>,
    pub establishments: Arc<dyn EstablishmentRepository>,
    pub cache: Arc<dyn CacheAdapter>,
    pub renderer: QrRenderer,
    pub compositor: Arc<TemplateCompositor>,
    pub auth: Arc<AuthConfig>,
}

impl PixService {
    pub fn new(
        pix_repo: Arc<dyn PixRepository>,
        establishments: Arc<dyn EstablishmentRepository>,
        cache: Arc<dyn CacheAdapter>,
        compositor: TemplateCompositor,
        auth: AuthConfig,
    ) -> Self {
        Self {
            pix_repo,
            establishments,
            cache,
            renderer: QrRenderer::default(),
            compositor: Arc::new(compositor),
            auth: Arc::new(auth),
        }
    }

    pub fn with_renderer(mut self, renderer: QrRenderer) -> Self {
        self.renderer = renderer;
        self
    }
}
