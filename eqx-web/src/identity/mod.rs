//! Identity provider
//!
//! Supplies the canonical identity (name, email) behind a signed session.
//! The workflow consumes only [`IdentityProvider::current_identity`]; it
//! never inspects tokens. Sign-up, sign-in and sign-out are provider
//! operations used by the auth API.

pub mod password;
pub mod sessions;

use async_trait::async_trait;
use chrono::Utc;
use eqx_common::models::Identity;
use eqx_common::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

pub use sessions::SESSION_COOKIE;

/// External-collaborator seam: resolve a session to an identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current session token to an identity, or None when there
    /// is no valid session.
    async fn current_identity(&self, session_token: Option<&str>) -> Result<Option<Identity>>;
}

/// New identity parameters for sign-up
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Result of a sign-up attempt
#[derive(Debug)]
pub enum SignUpOutcome {
    /// Identity created and session opened
    Created { identity: Identity, token: String },
    /// Email is already registered to another identity
    EmailTaken,
}

/// Session-backed identity provider over the identities/sessions tables
pub struct SessionIdentityProvider {
    db: SqlitePool,
    session_ttl_minutes: i64,
}

impl SessionIdentityProvider {
    pub fn new(db: SqlitePool, session_ttl_minutes: i64) -> Self {
        Self {
            db,
            session_ttl_minutes,
        }
    }

    /// Create an identity and open a session for it.
    pub async fn sign_up(&self, new: NewIdentity) -> Result<SignUpOutcome> {
        let email = new.email.trim().to_lowercase();
        if email.is_empty() || new.first_name.trim().is_empty() || new.last_name.trim().is_empty()
        {
            return Err(Error::InvalidInput(
                "first name, last name and email are required".to_string(),
            ));
        }
        if new.password.is_empty() {
            return Err(Error::InvalidInput("password is required".to_string()));
        }

        let identity = Identity {
            user_id: Uuid::new_v4(),
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            email,
        };
        let password_hash = password::hash_password(&new.password)?;

        let inserted = sqlx::query(
            "INSERT INTO identities (user_id, first_name, last_name, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(identity.user_id.to_string())
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(&identity.email)
        .bind(&password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await;

        match inserted {
            Ok(_) => {}
            // UNIQUE COLLATE NOCASE on email
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Ok(SignUpOutcome::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        }

        let token =
            sessions::create_session(&self.db, identity.user_id, self.session_ttl_minutes).await?;
        Ok(SignUpOutcome::Created { identity, token })
    }

    /// Verify credentials and open a session.
    ///
    /// Returns None on unknown email or wrong password; callers decide how
    /// to surface that without leaking which half failed.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Option<(Identity, String)>> {
        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT user_id, first_name, last_name, email, password_hash \
             FROM identities WHERE email = ?",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?;

        let Some((user_id, first_name, last_name, email, password_hash)) = row else {
            return Ok(None);
        };

        if !password::verify_password(password, &password_hash)? {
            return Ok(None);
        }

        let identity = Identity {
            user_id: user_id
                .parse()
                .map_err(|e| Error::Internal(format!("Malformed user_id: {}", e)))?,
            first_name,
            last_name,
            email,
        };
        let token =
            sessions::create_session(&self.db, identity.user_id, self.session_ttl_minutes).await?;
        Ok(Some((identity, token)))
    }

    /// Delete the session behind a token (sign-out)
    pub async fn sign_out(&self, session_token: &str) -> Result<()> {
        sessions::delete_session(&self.db, session_token).await
    }

    async fn identity_by_id(&self, user_id: Uuid) -> Result<Option<Identity>> {
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            "SELECT user_id, first_name, last_name, email FROM identities WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.db)
        .await?;

        row.map(|(user_id, first_name, last_name, email)| {
            Ok(Identity {
                user_id: user_id
                    .parse()
                    .map_err(|e| Error::Internal(format!("Malformed user_id: {}", e)))?,
                first_name,
                last_name,
                email,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn current_identity(&self, session_token: Option<&str>) -> Result<Option<Identity>> {
        let Some(token) = session_token else {
            return Ok(None);
        };

        let Some(user_id) = sessions::session_user(&self.db, token).await? else {
            return Ok(None);
        };

        self.identity_by_id(user_id).await
    }
}
