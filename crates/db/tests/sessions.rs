//! Integration tests for refresh-token rotation.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use stemsight_core::types::DbId;
use stemsight_db::models::session::IssuedRefreshToken;
use stemsight_db::models::user::CreateUser;
use stemsight_db::repositories::{SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> DbId {
    let input = CreateUser {
        email: "house@stemsight.test".to_string(),
        display_name: "Dr. House".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: "clinician".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

fn token(user_id: DbId, hash: &str, ttl: Duration) -> IssuedRefreshToken {
    IssuedRefreshToken {
        user_id,
        token_hash: hash.to_string(),
        expires_at: Utc::now() + ttl,
    }
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_token_is_spent_once(pool: PgPool) {
    let user = seed_user(&pool).await;
    SessionRepo::open(&pool, &token(user, "hash-a", Duration::days(7)))
        .await
        .unwrap();

    assert_eq!(SessionRepo::consume(&pool, "hash-a").await.unwrap(), Some(user));
    assert_eq!(SessionRepo::consume(&pool, "hash-a").await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_consume_has_one_winner(pool: PgPool) {
    let user = seed_user(&pool).await;
    SessionRepo::open(&pool, &token(user, "hash-race", Duration::days(7)))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        SessionRepo::consume(&pool, "hash-race"),
        SessionRepo::consume(&pool, "hash-race"),
    );
    let winners = [first.unwrap(), second.unwrap()]
        .into_iter()
        .flatten()
        .count();
    assert_eq!(winners, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_and_unknown_tokens_are_refused(pool: PgPool) {
    let user = seed_user(&pool).await;
    SessionRepo::open(&pool, &token(user, "hash-old", Duration::minutes(-1)))
        .await
        .unwrap();

    assert_eq!(SessionRepo::consume(&pool, "hash-old").await.unwrap(), None);
    assert_eq!(SessionRepo::consume(&pool, "never-issued").await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_token_hash_is_rejected(pool: PgPool) {
    let user = seed_user(&pool).await;
    SessionRepo::open(&pool, &token(user, "hash-dup", Duration::days(7)))
        .await
        .unwrap();

    let err = SessionRepo::open(&pool, &token(user, "hash-dup", Duration::days(7)))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.constraint(), Some("uq_user_sessions_refresh_token_hash"));
}

// ---------------------------------------------------------------------------
// Bulk revocation + purge
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn end_all_then_purge(pool: PgPool) {
    let user = seed_user(&pool).await;
    for hash in ["hash-1", "hash-2"] {
        SessionRepo::open(&pool, &token(user, hash, Duration::days(7)))
            .await
            .unwrap();
    }
    SessionRepo::open(&pool, &token(user, "hash-3", Duration::minutes(-5)))
        .await
        .unwrap();

    assert_eq!(SessionRepo::end_all_for_user(&pool, user).await.unwrap(), 3);
    assert_eq!(SessionRepo::consume(&pool, "hash-1").await.unwrap(), None);
    assert_eq!(SessionRepo::purge_stale(&pool).await.unwrap(), 3);
    assert_eq!(SessionRepo::purge_stale(&pool).await.unwrap(), 0);
}
