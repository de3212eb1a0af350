use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, auth, pix};
use crate::middleware::{require_auth, track_metrics};
use crate::AppState;

pub fn app_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/generate", post(pix::generate))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .route("/registrar", post(auth::register))
        .route("/login", post(auth::login))
        .route("/download-qrcode", get(pix::download_qrcode))
        .merge(protected);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api)
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
