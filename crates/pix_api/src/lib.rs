pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod views;

use std::sync::Arc;

use pix_service::PixService;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub service: PixService,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(service: PixService) -> Result<Self, prometheus::Error> {
        Ok(Self { service, metrics: Arc::new(Metrics::new()?) })
    }
}

pub use routes::app_router;
