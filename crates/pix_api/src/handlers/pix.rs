use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::info;

use pix_core::PixRequest;
use pix_service::{Claims, Download, DownloadFormat};

use crate::error::ApiError;
use crate::views::{download, success};
use crate::AppState;

pub async fn generate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<PixRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let result = state.service.generate(req).await?;
    info!(establishment = %claims.sub, "pix generated via API");
    Ok(success(StatusCode::OK, result))
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub codigo_pix: String,
    pub format: Option<String>,
    pub template: Option<String>,
}

pub async fn download_qrcode(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let format = DownloadFormat::parse(params.format.as_deref());
    let out = state
        .service
        .download(&params.codigo_pix, format, params.template.as_deref())
        .await?;

    Ok(match out {
        Download::Json(result) => success(StatusCode::OK, result),
        Download::Png { filename, data } => download(filename, "image/png", data),
    })
}
