//! Server-side session records
//!
//! A session is a 32-byte random token handed to the browser as an HttpOnly
//! cookie. Only the SHA-256 of the token is stored, so a leaked database
//! cannot be replayed as cookies. Expired rows are deleted on lookup.

use chrono::{DateTime, Duration, Utc};
use eqx_common::Result;
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Session cookie name
pub const SESSION_COOKIE: &str = "eqx_session";

/// Generate a fresh session token (64 hex chars)
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// SHA-256 of a token, as stored in the sessions table
pub fn token_hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Create a session row for a user; returns the raw token for the cookie
pub async fn create_session(pool: &SqlitePool, user_id: Uuid, ttl_minutes: i64) -> Result<String> {
    let token = generate_token();
    let now = Utc::now();
    let expires_at = now + Duration::minutes(ttl_minutes);

    sqlx::query(
        "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(token_hash(&token))
    .bind(user_id.to_string())
    .bind(now.to_rfc3339())
    .bind(expires_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(token)
}

/// Resolve a raw token to the owning user id, or None if unknown/expired.
///
/// Expired rows are deleted on sight rather than by a background sweeper.
pub async fn session_user(pool: &SqlitePool, token: &str) -> Result<Option<Uuid>> {
    let hash = token_hash(token);

    let row: Option<(String, String)> =
        sqlx::query_as("SELECT user_id, expires_at FROM sessions WHERE token_hash = ?")
            .bind(&hash)
            .fetch_optional(pool)
            .await?;

    let Some((user_id, expires_at)) = row else {
        return Ok(None);
    };

    let expires_at: DateTime<Utc> = expires_at
        .parse()
        .map_err(|e| eqx_common::Error::Internal(format!("Malformed expires_at: {}", e)))?;

    if expires_at <= Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(&hash)
            .execute(pool)
            .await?;
        return Ok(None);
    }

    let user_id = user_id
        .parse()
        .map_err(|e| eqx_common::Error::Internal(format!("Malformed user_id: {}", e)))?;
    Ok(Some(user_id))
}

/// Delete a session (sign-out); unknown tokens are a no-op
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash(token))
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqx_common::db::create_schema;

    async fn pool_with_user(user_id: Uuid) -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO identities (user_id, first_name, last_name, email, password_hash, created_at) \
             VALUES (?, 'Jane', 'Doe', 'jane@x.com', 'h', ?)",
        )
        .bind(user_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[test]
    fn tokens_are_unique_and_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn session_round_trip() {
        let user_id = Uuid::new_v4();
        let pool = pool_with_user(user_id).await;

        let token = create_session(&pool, user_id, 60).await.unwrap();
        assert_eq!(session_user(&pool, &token).await.unwrap(), Some(user_id));

        delete_session(&pool, &token).await.unwrap();
        assert_eq!(session_user(&pool, &token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() {
        let user_id = Uuid::new_v4();
        let pool = pool_with_user(user_id).await;

        let token = create_session(&pool, user_id, 60).await.unwrap();

        // Force the row into the past
        sqlx::query("UPDATE sessions SET expires_at = ?")
            .bind((Utc::now() - Duration::minutes(1)).to_rfc3339())
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(session_user(&pool, &token).await.unwrap(), None);

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let pool = pool_with_user(Uuid::new_v4()).await;
        assert_eq!(session_user(&pool, "deadbeef").await.unwrap(), None);
    }
}
