// crates/pix_api/tests/api.rs
//
// Request/response tests against the full router, backed by in-memory
// repositories and cache.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pix_api::{app_router, AppState};
use pix_core::render::{TemplateCompositor, TemplateRegistry};
use pix_db::{MemoryEstablishmentRepository, MemoryPixRepository};
use pix_service::{AuthConfig, MemoryCache, PixService};

const MINIMAL_CODE: &str = "00020101021126370014BR.GOV.BCB.PIX0115maria@email.com\
                            5204000053039865802BR5914MARIA OLIVEIRA6014RIO DE JANEIRO\
                            62070503***6304F98D";

fn app_with_templates(dir: &Path) -> Router {
    let service = PixService::new(
        Arc::new(MemoryPixRepository::new()),
        Arc::new(MemoryEstablishmentRepository::new()),
        Arc::new(MemoryCache::new()),
        TemplateCompositor::new(TemplateRegistry::with_defaults(dir)),
        AuthConfig::new("api-test-secret", 24).with_bcrypt_cost(4),
    );
    app_router(AppState::new(service).unwrap())
}

fn app() -> Router {
    app_with_templates(Path::new("./templates"))
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn register_and_login(app: &Router) -> String {
    let (status, _) = send_json(
        app,
        json_request(
            "POST",
            "/api/registrar",
            json!({"nome": "Loja", "email": "loja@email.com", "senha": "senha123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        app,
        json_request(
            "POST",
            "/api/login",
            json!({"email": "loja@email.com", "senha": "senha123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn encode_query(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

#[tokio::test]
async fn banner_and_health() {
    let app = app();
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/api/login"));

    let (status, body) = send_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_requires_a_bearer_token() {
    let app = app();
    let payload = json!({"nome": "A", "chave": "k", "cidade": "B"});

    let (status, body) = send_json(&app, json_request("POST", "/api/generate", payload.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let mut req = json_request("POST", "/api/generate", payload.clone(), None);
    req.headers_mut().insert(header::AUTHORIZATION, "Token abc".parse().unwrap());
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, json_request("POST", "/api/generate", payload, Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn generate_returns_the_envelope() {
    let app = app();
    let token = register_and_login(&app).await;

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/generate",
            json!({"nome": "MARIA OLIVEIRA", "chave": "maria@email.com", "cidade": "RIO DE JANEIRO"}),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    assert_eq!(body["data"]["codigo_pix"], MINIMAL_CODE);
    assert!(body["data"]["qrcode_svg"].as_str().unwrap().contains("<svg"));
    assert!(body["data"]["qrcode_png"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn generate_validation_errors_are_400() {
    let app = app();
    let token = register_and_login(&app).await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/api/generate", json!({"nome": "", "chave": "k", "cidade": "B"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("nome"));

    let (status, _) = send_json(
        &app,
        json_request("POST", "/api/generate", json!({"nome": "A", "chave": "k", "cidade": "B", "valor": -1.0}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        json_request("POST", "/api/generate", json!({"nome": "A", "chave": "k", "cidade": "B", "valor": 1.0e12}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let mut req = json_request("POST", "/api/generate", json!({}), Some(&token));
    *req.body_mut() = Body::from("{not json");
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn registration_conflict_and_bad_login() {
    let app = app();
    register_and_login(&app).await;

    let (status, body) = send_json(
        &app,
        json_request(
            "POST",
            "/api/registrar",
            json!({"nome": "Outra", "email": "loja@email.com", "senha": "senha456"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send_json(
        &app,
        json_request("POST", "/api/login", json!({"email": "loja@email.com", "senha": "errada1"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        json_request(
            "POST",
            "/api/registrar",
            json!({"nome": "X", "email": "nope", "senha": "1"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_png_json_and_missing() {
    let app = app();
    let token = register_and_login(&app).await;
    send_json(
        &app,
        json_request(
            "POST",
            "/api/generate",
            json!({"nome": "MARIA OLIVEIRA", "chave": "maria@email.com", "cidade": "RIO DE JANEIRO"}),
            Some(&token),
        ),
    )
    .await;

    let code = encode_query(MINIMAL_CODE);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/download-qrcode?codigo_pix={}", code)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=pix_qrcode.png"
    );
    let png = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&png[1..4], b"PNG");

    let (status, body) =
        send_json(&app, get(&format!("/api/download-qrcode?codigo_pix={}&format=json", code))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["codigo_pix"], MINIMAL_CODE);

    let (status, body) = send_json(&app, get("/api/download-qrcode?codigo_pix=000201x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send_json(&app, get("/api/download-qrcode")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_with_template() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::from_pixel(700, 700, image::Rgba([10, 10, 10, 255]))
        .save(dir.path().join("template_pix_1.png"))
        .unwrap();
    let app = app_with_templates(dir.path());
    let token = register_and_login(&app).await;
    send_json(
        &app,
        json_request(
            "POST",
            "/api/generate",
            json!({"nome": "MARIA OLIVEIRA", "chave": "maria@email.com", "cidade": "RIO DE JANEIRO"}),
            Some(&token),
        ),
    )
    .await;

    let uri = format!(
        "/api/download-qrcode?codigo_pix={}&template=template_pix_1",
        encode_query(MINIMAL_CODE)
    );
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=pix_template.png"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (700, 700));

    let uri = format!(
        "/api/download-qrcode?codigo_pix={}&template=nope",
        encode_query(MINIMAL_CODE)
    );
    let (status, _) = send_json(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_count_requests() {
    let app = app();
    send(&app, get("/health")).await;
    send(&app, get("/health")).await;

    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains(r#"pix_http_requests_total{method="GET",path="/health",status="200"} 2"#));
}
