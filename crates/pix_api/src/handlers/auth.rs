use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use pix_core::models::establishment::{LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::views::success;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let created = state.service.register(req).await?;
    Ok(success(StatusCode::CREATED, created))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let session = state.service.login(req).await?;
    Ok(success(StatusCode::OK, session))
}
