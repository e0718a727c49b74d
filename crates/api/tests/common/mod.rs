#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stemsight_api::auth::jwt::JwtConfig;
use stemsight_api::auth::password::hash_password;
use stemsight_api::config::{PasswordResetConfig, ServerConfig};
use stemsight_api::router::build_app_router;
use stemsight_api::state::AppState;
use stemsight_api::streaming::StreamHub;
use stemsight_api::ws::WsManager;
use stemsight_db::models::patient::{CreatePatient, Patient};
use stemsight_db::models::user::{CreateUser, User};
use stemsight_db::models::video::{CreateVideo, Video};
use stemsight_db::repositories::{PatientRepo, UserRepo, VideoRepo};
use stemsight_events::EventBus;

pub const TEST_PASSWORD: &str = "ward-rounds-2026";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        password_reset: PasswordResetConfig {
            url: "http://localhost:3000/password-reset".to_string(),
            expiry_mins: 30,
        },
        stream_recording_dir: None,
        media_public_base_url: "http://localhost:8000/media".to_string(),
    }
}

/// Build the application state used by [`build_test_app`]. Exposed so tests
/// can subscribe to the event bus.
pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        stream_hub: Arc::new(StreamHub::default()),
        email: None,
    }
}

/// Full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        display_name: format!("Dr. {}", email.split('@').next().unwrap_or(email)),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub async fn create_patient(pool: &PgPool) -> Patient {
    let input = CreatePatient {
        first_name: "Grace".to_string(),
        middle_name: None,
        last_name: "Hopper".to_string(),
        dob: chrono::NaiveDate::from_ymd_opt(1950, 12, 9).unwrap(),
        primary_phone: "555-0100".to_string(),
        address: "1 Harbor Way".to_string(),
    };
    PatientRepo::create(pool, &input)
        .await
        .expect("patient creation should succeed")
}

pub async fn create_video(pool: &PgPool, patient_id: uuid::Uuid, duration: Option<f64>) -> Video {
    let input = CreateVideo {
        patient_id,
        file_path: format!("{}.mp4", uuid::Uuid::new_v4()),
        description: Some("Overnight monitoring".to_string()),
        duration_seconds: duration,
    };
    VideoRepo::create(pool, &input, "http://localhost:8000/media/test.mp4")
        .await
        .expect("video creation should succeed")
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["access_token"]
        .as_str()
        .expect("login must return an access token")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request("PATCH", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("DELETE", uri, Some(token))).await
}
