//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Covers login, refresh rotation, logout, the current-session endpoint and
//! the password reset round trip.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get, get_auth, login, post_json, post_json_auth, TEST_PASSWORD};
use sqlx::PgPool;
use stemsight_api::auth::jwt::generate_opaque_token;
use stemsight_db::models::password_reset::CreatePasswordReset;
use stemsight_db::repositories::PasswordResetRepo;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_tokens_and_user(pool: PgPool) {
    let user = create_user(&pool, "house@stemsight.test", "clinician").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "HOUSE@stemsight.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["expires_in"], 15 * 60);
    assert_eq!(json["data"]["user"]["id"], user.id.to_string());
    assert_eq!(json["data"]["user"]["role"], "clinician");
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_is_401(pool: PgPool) {
    create_user(&pool, "cuddy@stemsight.test", "admin").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "cuddy@stemsight.test", "password": "not-it-123" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_email_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "ghost@stemsight.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_blank_fields_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "  ", "password": "" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Protected routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/patients").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/patients", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    let user = create_user(&pool, "wilson@stemsight.test", "clinician").await;
    let app = common::build_test_app(pool);
    let token = login(app.clone(), "wilson@stemsight.test").await;

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "wilson@stemsight.test");
    assert_eq!(json["data"]["id"], user.id.to_string());
}

// ---------------------------------------------------------------------------
// Refresh + logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    create_user(&pool, "chase@stemsight.test", "clinician").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "chase@stemsight.test", "password": TEST_PASSWORD });
    let json = body_json(post_json(app.clone(), "/api/v1/auth/login", body).await).await;
    let refresh_token = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["data"]["refresh_token"], refresh_token.as_str());

    // The old token was revoked by the rotation.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "foreman@stemsight.test", "clinician").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "foreman@stemsight.test", "password": TEST_PASSWORD });
    let json = body_json(post_json(app.clone(), "/api/v1/auth/login", body).await).await;
    let access = json["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = json["data"]["refresh_token"].as_str().unwrap().to_string();

    let response =
        post_json_auth(app.clone(), "/api/v1/auth/logout", serde_json::json!({}), &access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_request_does_not_reveal_accounts(pool: PgPool) {
    create_user(&pool, "taub@stemsight.test", "clinician").await;
    let app = common::build_test_app(pool);

    let known = post_json(
        app.clone(),
        "/api/v1/auth/request-password-reset",
        serde_json::json!({ "email": "taub@stemsight.test" }),
    )
    .await;
    let unknown = post_json(
        app,
        "/api/v1/auth/request-password-reset",
        serde_json::json!({ "email": "nobody@stemsight.test" }),
    )
    .await;

    assert_eq!(known.status(), StatusCode::OK);
    assert_eq!(unknown.status(), StatusCode::OK);
    assert_eq!(body_json(known).await, body_json(unknown).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_token_changes_password_once(pool: PgPool) {
    let user = create_user(&pool, "thirteen@stemsight.test", "clinician").await;
    let (token, token_hash) = generate_opaque_token();
    PasswordResetRepo::create(
        &pool,
        &CreatePasswordReset {
            user_id: user.id,
            token_hash,
            expires_at: chrono::Utc::now() + chrono::Duration::minutes(30),
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "token": token,
        "new_password": "fresh-start-42",
        "confirm_password": "fresh-start-42",
    });
    let response = post_json(app.clone(), "/api/v1/auth/confirm-password-reset", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let replay = post_json(app.clone(), "/api/v1/auth/confirm-password-reset", body).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);

    let login_body = serde_json::json!({
        "email": "thirteen@stemsight.test",
        "password": "fresh-start-42",
    });
    let response = post_json(app, "/api/v1/auth/login", login_body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_confirmation_mismatch_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "token": "whatever",
        "new_password": "fresh-start-42",
        "confirm_password": "fresh-start-43",
    });
    let response = post_json(app, "/api/v1/auth/confirm-password-reset", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Passwords do not match");
}
