//! Profile store boundary
//!
//! The verification workflow talks to the profile store through this trait
//! only. Both operations are treated as remote calls that may fail; failures
//! surface as `StoreUnavailable` (unreachable) or `WriteRejected` (reached
//! but refused) and never advance workflow state.

pub mod sqlite;

use async_trait::async_trait;
use eqx_common::models::{VerificationFields, VerificationProfile};
use eqx_common::Result;
use uuid::Uuid;

pub use sqlite::SqliteProfileStore;

/// Document-store seam: one verification profile per user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up the profile for a user, if one exists
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<VerificationProfile>>;

    /// Create-if-absent, update-if-present, keyed by `user_id`.
    ///
    /// Sets `is_verified = true` and returns the surviving record id. After
    /// the call exactly one record exists for the user regardless of how
    /// many times it is invoked.
    async fn upsert_profile(&self, user_id: Uuid, fields: &VerificationFields) -> Result<Uuid>;
}
