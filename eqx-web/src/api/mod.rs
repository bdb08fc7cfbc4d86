//! HTTP API handlers for eqx-web

pub mod auth;
pub mod health;
pub mod ui;
pub mod verification;

pub use health::health_routes;

use axum::http::{header, HeaderMap};
use eqx_common::models::Identity;

use crate::identity::{IdentityProvider, SESSION_COOKIE};
use crate::workflow::WorkflowState;
use crate::{ApiError, ApiResult, AppState};

/// Pull the session token out of the Cookie header, if present
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Resolve the request's identity via the identity provider
pub async fn current_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> ApiResult<Option<Identity>> {
    let token = session_token(headers);
    Ok(state.identity.current_identity(token.as_deref()).await?)
}

/// Resolve identity for an API route; 401 when there is no valid session
pub async fn require_identity(state: &AppState, headers: &HeaderMap) -> ApiResult<Identity> {
    current_identity(state, headers)
        .await?
        .ok_or(ApiError::Unauthenticated)
}

/// Evaluate the workflow entry state for this request.
///
/// Runs on every page load; nothing is carried over from previous requests,
/// so an expired server-side session immediately demotes the client.
pub async fn workflow_state(state: &AppState, headers: &HeaderMap) -> ApiResult<WorkflowState> {
    let identity = current_identity(state, headers).await?;

    let profile = match &identity {
        Some(identity) => state.store.find_profile(identity.user_id).await?,
        None => None,
    };

    Ok(WorkflowState::evaluate(identity, profile.as_ref()))
}
