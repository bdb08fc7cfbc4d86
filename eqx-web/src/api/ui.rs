//! UI Routes - HTML pages for the Equinox dashboard
//!
//! Vanilla HTML/CSS/JS served inline (no template engine, no frontend
//! framework). Every protected page re-evaluates the workflow state
//! server-side before rendering, so gating never depends on client state.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};

use eqx_common::models::Identity;

use crate::workflow::form::form_fields;
use crate::workflow::{routes, WorkflowState};
use crate::{ApiResult, AppState};

/// Shared page chrome
const PAGE_STYLE: &str = r#"
body { font-family: system-ui, -apple-system, sans-serif; max-width: 520px; margin: 40px auto; padding: 20px; line-height: 1.6; color: #1f2937; }
h1 { color: #333; border-bottom: 2px solid #5b21b6; padding-bottom: 10px; }
label { display: block; margin-top: 12px; font-weight: 500; }
input { width: 100%; padding: 8px; margin-top: 4px; box-sizing: border-box; border: 1px solid #d1d5db; border-radius: 4px; }
input:disabled { background: #f3f4f6; cursor: not-allowed; }
button { margin-top: 20px; padding: 10px 20px; background: #5b21b6; color: white; border: none; border-radius: 4px; cursor: pointer; }
button:disabled { background: #9ca3af; cursor: not-allowed; }
.error { color: #b91c1c; margin-top: 12px; min-height: 1.2em; }
.muted { color: #6b7280; font-size: 0.9em; }
.balance-box { border: 1px solid #d1d5db; border-radius: 8px; padding: 16px 20px; margin-top: 20px; }
.balance-box .amount { font-size: 1.8em; font-weight: 700; }
.spinner { height: 64px; width: 64px; margin: 40px auto; border: 4px solid #5b21b6; border-top-color: transparent; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.center { text-align: center; }
"#;

/// Assemble a full page; dynamic values go into `body` or `script`, never
/// into the chrome.
fn page(title: &str, body: &str, script: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title} - Equinox</title>\n<style>{PAGE_STYLE}</style>\n</head>\n\
         <body>\n{body}\n<script>\n{script}\n</script>\n</body>\n</html>"
    ))
}

/// Escape a value for embedding in HTML attribute/text positions
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// GET /sign-in
// ---------------------------------------------------------------------------

const SIGN_IN_BODY: &str = r#"
<h1>Equinox</h1>
<p class="muted">Sign in to access and manage your accounts.</p>

<form id="sign-in-form">
    <h2>Sign In</h2>
    <label for="si-email">Email</label>
    <input type="text" id="si-email" name="email">
    <label for="si-password">Password</label>
    <input type="password" id="si-password" name="password">
    <button type="submit">Sign In</button>
    <p class="error" id="si-error"></p>
</form>

<form id="sign-up-form">
    <h2>New here? Sign Up</h2>
    <label for="su-first">First Name</label>
    <input type="text" id="su-first" name="firstName">
    <label for="su-last">Last Name</label>
    <input type="text" id="su-last" name="lastName">
    <label for="su-email">Email</label>
    <input type="text" id="su-email" name="email">
    <label for="su-password">Password</label>
    <input type="password" id="su-password" name="password">
    <button type="submit">Sign Up</button>
    <p class="error" id="su-error"></p>
</form>
"#;

const SIGN_IN_SCRIPT: &str = r#"
async function postJson(url, payload) {
    const res = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
    });
    if (res.ok) return null;
    const body = await res.json().catch(() => null);
    return body && body.error ? body.error.message : 'Request failed, please try again.';
}

document.getElementById('sign-in-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const error = await postJson('/api/auth/sign-in', {
        email: document.getElementById('si-email').value,
        password: document.getElementById('si-password').value,
    });
    if (error === null) { window.location.href = '/verification'; return; }
    document.getElementById('si-error').textContent = error;
});

document.getElementById('sign-up-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const error = await postJson('/api/auth/sign-up', {
        firstName: document.getElementById('su-first').value,
        lastName: document.getElementById('su-last').value,
        email: document.getElementById('su-email').value,
        password: document.getElementById('su-password').value,
    });
    if (error === null) { window.location.href = '/verification'; return; }
    document.getElementById('su-error').textContent = error;
});
"#;

/// GET /sign-in - public auth page
///
/// An already-authenticated visitor funnels straight into the verification
/// workflow instead of seeing the form again.
pub async fn sign_in_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    if super::current_identity(&state, &headers).await?.is_some() {
        return Ok(Redirect::to(routes::VERIFICATION).into_response());
    }
    Ok(page("Sign In", SIGN_IN_BODY, SIGN_IN_SCRIPT).into_response())
}

// ---------------------------------------------------------------------------
// GET / (home)
// ---------------------------------------------------------------------------

const HOME_SCRIPT: &str = r#"
document.getElementById('sign-out').addEventListener('click', async () => {
    await fetch('/api/auth/sign-out', { method: 'POST' });
    window.location.href = '/sign-in';
});
"#;

fn home_html(identity: &Identity) -> Html<String> {
    let body = format!(
        "<h1>Welcome, {first} {last}</h1>\n\
         <p class=\"muted\">Access and manage your account and transactions.</p>\n\
         <div class=\"balance-box\">\n\
             <p class=\"muted\">1 Bank Account</p>\n\
             <p>Total Current Balance</p>\n\
             <p class=\"amount\">$1,250.35</p>\n\
         </div>\n\
         <h2>Recent Transactions</h2>\n\
         <p class=\"muted\">No transactions yet.</p>\n\
         <button id=\"sign-out\">Sign Out</button>",
        first = escape_html(&identity.first_name),
        last = escape_html(&identity.last_name),
    );
    page("Home", &body, HOME_SCRIPT)
}

/// GET /
///
/// Home is for verified users only: no session redirects to sign-in, an
/// unverified session funnels into the verification workflow.
pub async fn home_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    match super::workflow_state(&state, &headers).await? {
        WorkflowState::Unauthenticated => Ok(Redirect::to(routes::SIGN_IN).into_response()),
        WorkflowState::AuthenticatedUnverified { .. } | WorkflowState::Submitting { .. } => {
            Ok(Redirect::to(routes::VERIFICATION).into_response())
        }
        WorkflowState::Verified { identity } => Ok(home_html(&identity).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET /verification (loader)
// ---------------------------------------------------------------------------

/// Loader hold time; pacing only, not a consistency mechanism
const LOADER_WAIT_MS: u32 = 5000;

const LOADER_SCRIPT: &str = r#"
let remaining = Math.floor(WAIT_MS / 1000);
const counter = document.getElementById('count');
const target = VERIFIED ? '/' : '/verification/details';

const tick = setInterval(() => {
    remaining -= 1;
    if (counter) counter.textContent = remaining;
}, 1000);
const redirect = setTimeout(() => { window.location.href = target; }, WAIT_MS);

// A torn-down page must not fire a dangling redirect
window.addEventListener('pagehide', () => {
    clearInterval(tick);
    clearTimeout(redirect);
});
"#;

fn loader_html(verified: bool) -> Html<String> {
    let body = "<div class=\"center\">\n\
                    <div class=\"spinner\"></div>\n\
                    <p>Checking if user is verified &hellip; <span id=\"count\">5</span></p>\n\
                </div>";
    // verified is resolved at render time; the countdown never re-polls
    let script = format!(
        "const WAIT_MS = {};\nconst VERIFIED = {};\n{}",
        LOADER_WAIT_MS, verified, LOADER_SCRIPT
    );
    page("Verification", body, &script)
}

/// GET /verification - timed holding screen
pub async fn verification_loader_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    match super::workflow_state(&state, &headers).await? {
        WorkflowState::Unauthenticated => Ok(Redirect::to(routes::SIGN_IN).into_response()),
        authenticated => {
            let verified = matches!(authenticated, WorkflowState::Verified { .. });
            Ok(loader_html(verified).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// GET /verification/details (form)
// ---------------------------------------------------------------------------

const FORM_SCRIPT: &str = r#"
const form = document.getElementById('verification-form');
const submit = document.getElementById('submit');
const message = document.getElementById('message');
const editable = Array.from(form.querySelectorAll('input:not([disabled])'));
let inFlight = false;

// Submit stays disabled until every editable field is non-empty, and while
// a request is in flight (double-submit guard).
function refresh() {
    submit.disabled = inFlight || editable.some(i => i.value.trim() === '');
}
editable.forEach(i => i.addEventListener('input', refresh));

form.addEventListener('submit', async (e) => {
    e.preventDefault();
    if (inFlight) return;
    inFlight = true;
    refresh();
    message.textContent = '';

    const payload = {};
    editable.forEach(i => { payload[i.name] = i.value; });

    try {
        const res = await fetch('/api/verification/submit', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(payload),
        });
        if (res.ok) {
            // Full navigation; no partial re-render state retained
            window.location.href = '/';
            return;
        }
        const body = await res.json().catch(() => null);
        message.textContent = body && body.error
            ? body.error.message
            : 'Submission failed, please try again.';
    } catch (err) {
        message.textContent = 'Submission failed, please try again.';
    }
    inFlight = false;
    refresh();
});

refresh();
"#;

/// GET /verification/details - the verification form
pub async fn verification_details_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let Some(identity) = super::current_identity(&state, &headers).await? else {
        return Ok(Redirect::to(routes::SIGN_IN).into_response());
    };
    let existing = state.store.find_profile(identity.user_id).await?;

    let mut inputs = String::new();
    for field in form_fields(&identity, existing.as_ref()) {
        let input_type = if field.secret { "password" } else { "text" };
        let disabled = if field.read_only { " disabled" } else { "" };
        inputs.push_str(&format!(
            "<label for=\"{name}\">{label}</label>\n\
             <input type=\"{input_type}\" id=\"{name}\" name=\"{name}\" value=\"{value}\"{disabled}>\n",
            name = field.name,
            label = field.label,
            value = escape_html(&field.value),
        ));
    }

    let body = format!(
        "<h1>Verify Your Identity</h1>\n\
         <p class=\"muted\">Fields from your sign-in identity are locked.</p>\n\
         <form id=\"verification-form\">\n{inputs}\
         <button type=\"submit\" id=\"submit\" disabled>Verify &amp; Continue</button>\n\
         <p class=\"error\" id=\"message\"></p>\n\
         </form>"
    );

    Ok(page("Verification Details", &body, FORM_SCRIPT).into_response())
}
