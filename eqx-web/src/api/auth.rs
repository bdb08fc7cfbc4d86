//! Authentication API
//!
//! POST /api/auth/sign-up, /api/auth/sign-in, /api/auth/sign-out.
//! Sessions ride in an HttpOnly cookie; the browser client never sees the
//! token outside the Set-Cookie header.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::identity::{NewIdentity, SignUpOutcome, SESSION_COOKIE};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Identity echo returned by both sign-up and sign-in
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

fn with_session_cookie(body: AuthResponse, cookie: String) -> ApiResult<Response> {
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("Malformed cookie header: {}", e)))?;

    let mut response = (StatusCode::OK, Json(body)).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /api/auth/sign-up
///
/// Creates an identity and opens a session. 409 when the email is taken.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .identity
        .sign_up(NewIdentity {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        })
        .await?;

    match outcome {
        SignUpOutcome::Created { identity, token } => {
            info!(user_id = %identity.user_id, "Identity created");
            let cookie = session_cookie(&token, state.config.session_ttl_minutes * 60);
            with_session_cookie(
                AuthResponse {
                    user_id: identity.user_id,
                    first_name: identity.first_name,
                    last_name: identity.last_name,
                    email: identity.email,
                },
                cookie,
            )
        }
        SignUpOutcome::EmailTaken => {
            Err(ApiError::Conflict("email already registered".to_string()))
        }
    }
}

/// POST /api/auth/sign-in
///
/// One failure answer for unknown email and wrong password alike.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<Response> {
    let signed_in = state.identity.sign_in(&request.email, &request.password).await?;

    let Some((identity, token)) = signed_in else {
        return Err(ApiError::BadRequest("Invalid email or password".to_string()));
    };

    info!(user_id = %identity.user_id, "Signed in");
    let cookie = session_cookie(&token, state.config.session_ttl_minutes * 60);
    with_session_cookie(
        AuthResponse {
            user_id: identity.user_id,
            first_name: identity.first_name,
            last_name: identity.last_name,
            email: identity.email,
        },
        cookie,
    )
}

/// POST /api/auth/sign-out
///
/// Deletes the server-side session and expires the cookie. Succeeds even
/// without a session.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = super::session_token(&headers) {
        state.identity.sign_out(&token).await?;
    }

    let cookie = HeaderValue::from_str(&session_cookie("", 0))
        .map_err(|e| ApiError::Internal(format!("Malformed cookie header: {}", e)))?;
    let mut response = StatusCode::NO_CONTENT.into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}
