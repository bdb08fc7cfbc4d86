//! SQLite-backed profile store
//!
//! The upsert runs lookup-then-write inside a single transaction; the
//! `UNIQUE(user_id)` constraint on the table backstops the one-record-per-user
//! guarantee against writers racing from outside this process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eqx_common::models::{VerificationFields, VerificationProfile};
use eqx_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::ProfileStore;

pub struct SqliteProfileStore {
    db: SqlitePool,
}

impl SqliteProfileStore {
    /// Pool arrives from startup configuration; the store itself reads no
    /// environment.
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Store could not be reached at all (as opposed to refusing a statement)
fn is_unreachable(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn read_error(err: sqlx::Error) -> Error {
    if is_unreachable(&err) {
        Error::StoreUnavailable(err.to_string())
    } else {
        Error::Database(err)
    }
}

fn write_error(err: sqlx::Error) -> Error {
    if is_unreachable(&err) {
        Error::StoreUnavailable(err.to_string())
    } else if matches!(err, sqlx::Error::Database(_)) {
        Error::WriteRejected(err.to_string())
    } else {
        Error::Database(err)
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VerificationProfile> {
    let parse_uuid = |column: &str| -> Result<Uuid> {
        let raw: String = row.get(column);
        raw.parse()
            .map_err(|e| Error::Internal(format!("Malformed {}: {}", column, e)))
    };
    let parse_time = |column: &str| -> Result<DateTime<Utc>> {
        let raw: String = row.get(column);
        raw.parse()
            .map_err(|e| Error::Internal(format!("Malformed {}: {}", column, e)))
    };

    Ok(VerificationProfile {
        record_id: parse_uuid("record_id")?,
        user_id: parse_uuid("user_id")?,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
        date_of_birth: row.get("date_of_birth"),
        ssn: row.get("ssn"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_verified: row.get::<i64, _>("is_verified") != 0,
        created_at: parse_time("created_at")?,
        updated_at: parse_time("updated_at")?,
    })
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<VerificationProfile>> {
        let row = sqlx::query("SELECT * FROM verification_profiles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.db)
            .await
            .map_err(read_error)?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn upsert_profile(&self, user_id: Uuid, fields: &VerificationFields) -> Result<Uuid> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self.db.begin().await.map_err(write_error)?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT record_id FROM verification_profiles WHERE user_id = ?")
                .bind(user_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(read_error)?;

        let record_id = match existing {
            Some(record_id) => {
                sqlx::query(
                    "UPDATE verification_profiles SET \
                         first_name = ?, last_name = ?, address = ?, city = ?, state = ?, \
                         postal_code = ?, date_of_birth = ?, ssn = ?, email = ?, \
                         password_hash = ?, is_verified = 1, updated_at = ? \
                     WHERE record_id = ?",
                )
                .bind(&fields.first_name)
                .bind(&fields.last_name)
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.postal_code)
                .bind(&fields.date_of_birth)
                .bind(&fields.ssn)
                .bind(&fields.email)
                .bind(&fields.password_hash)
                .bind(&now)
                .bind(&record_id)
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;

                record_id
                    .parse()
                    .map_err(|e| Error::Internal(format!("Malformed record_id: {}", e)))?
            }
            None => {
                let record_id = Uuid::new_v4();
                sqlx::query(
                    "INSERT INTO verification_profiles ( \
                         record_id, user_id, first_name, last_name, address, city, state, \
                         postal_code, date_of_birth, ssn, email, password_hash, is_verified, \
                         created_at, updated_at \
                     ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
                )
                .bind(record_id.to_string())
                .bind(user_id.to_string())
                .bind(&fields.first_name)
                .bind(&fields.last_name)
                .bind(&fields.address)
                .bind(&fields.city)
                .bind(&fields.state)
                .bind(&fields.postal_code)
                .bind(&fields.date_of_birth)
                .bind(&fields.ssn)
                .bind(&fields.email)
                .bind(&fields.password_hash)
                .bind(&now)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;

                info!(user_id = %user_id, record_id = %record_id, "Created verification profile");
                record_id
            }
        };

        tx.commit().await.map_err(write_error)?;

        Ok(record_id)
    }
}
