//! Verification workflow API
//!
//! GET /api/verification/form, GET /api/verification/status,
//! POST /api/verification/submit.

use axum::{extract::State, http::HeaderMap, Json};
use eqx_common::models::{ProfileInput, VerificationFields};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::identity::password::hash_password;
use crate::workflow::form::{form_fields, FormField};
use crate::workflow::WorkflowState;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/verification/form response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub fields: Vec<FormField>,
}

/// GET /api/verification/status response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub user_id: Uuid,
    pub verified: bool,
}

/// POST /api/verification/submit response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub record_id: Uuid,
    pub verified: bool,
}

/// GET /api/verification/form
///
/// Field descriptors for the verification form: identity fields prefilled
/// and read-only, editable fields prefilled from any existing profile.
pub async fn form(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<FormResponse>> {
    let identity = super::require_identity(&state, &headers).await?;
    let existing = state.store.find_profile(identity.user_id).await?;

    Ok(Json(FormResponse {
        fields: form_fields(&identity, existing.as_ref()),
    }))
}

/// GET /api/verification/status
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<StatusResponse>> {
    let identity = super::require_identity(&state, &headers).await?;
    let profile = state.store.find_profile(identity.user_id).await?;

    Ok(Json(StatusResponse {
        user_id: identity.user_id,
        verified: profile.map(|p| p.is_verified).unwrap_or(false),
    }))
}

/// POST /api/verification/submit
///
/// Validate → merge identity + input → upsert. A store failure surfaces as
/// an error response and leaves the workflow where it was; the client form
/// stays editable and no retry is attempted server-side.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Json<SubmitResponse>> {
    let identity = super::require_identity(&state, &headers).await?;

    let empty = input.empty_fields();
    if !empty.is_empty() {
        return Err(ApiError::Validation(empty));
    }

    let existing = state.store.find_profile(identity.user_id).await?;
    let entry = WorkflowState::evaluate(Some(identity.clone()), existing.as_ref());

    // Resubmission after verification re-updates the same record; only the
    // unverified path passes through Submitting.
    let in_flight = match entry {
        WorkflowState::AuthenticatedUnverified { .. } => entry
            .begin_submit()
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        verified @ WorkflowState::Verified { .. } => verified,
        other => return Err(ApiError::Internal(format!("unexpected entry state {}", other.name()))),
    };

    let password_hash = hash_password(&input.password)?;
    let fields = VerificationFields::from_parts(&identity, &input, password_hash);

    match state.store.upsert_profile(identity.user_id, &fields).await {
        Ok(record_id) => {
            let done = match in_flight {
                WorkflowState::Submitting { .. } => in_flight
                    .submit_succeeded()
                    .map_err(|e| ApiError::Internal(e.to_string()))?,
                already_verified => already_verified,
            };
            info!(
                user_id = %identity.user_id,
                record_id = %record_id,
                state = done.name(),
                "Verification profile upserted"
            );
            Ok(Json(SubmitResponse {
                record_id,
                verified: true,
            }))
        }
        Err(store_err) => {
            // No state advances on failure; the prior record is untouched.
            if let WorkflowState::Submitting { .. } = in_flight {
                let back = in_flight
                    .submit_failed()
                    .map_err(|e| ApiError::Internal(e.to_string()))?;
                warn!(
                    user_id = %identity.user_id,
                    state = back.name(),
                    error = %store_err,
                    "Profile upsert failed"
                );
            }
            Err(store_err.into())
        }
    }
}
