//! Workflow state machine tests
//!
//! Covers entry evaluation from session/store contents, transition legality,
//! and redirect targets, without rendering anything.

use chrono::Utc;
use eqx_common::models::{Identity, VerificationProfile};
use eqx_web::workflow::{routes, WorkflowState};
use uuid::Uuid;

fn jane() -> Identity {
    Identity {
        user_id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@x.com".to_string(),
    }
}

fn profile_for(identity: &Identity, is_verified: bool) -> VerificationProfile {
    VerificationProfile {
        record_id: Uuid::new_v4(),
        user_id: identity.user_id,
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        address: "123 Main".to_string(),
        city: "Metropolis".to_string(),
        state: "CA".to_string(),
        postal_code: "90001".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        ssn: "123-45-6789".to_string(),
        email: identity.email.clone(),
        password_hash: "$argon2id$...".to_string(),
        is_verified,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn no_session_evaluates_to_unauthenticated() {
    let state = WorkflowState::evaluate(None, None);
    assert_eq!(state, WorkflowState::Unauthenticated);
    assert_eq!(state.redirect_target(), Some(routes::SIGN_IN));
    assert!(state.identity().is_none());
}

#[test]
fn no_session_ignores_any_profile() {
    // A stale client cannot grant access once the server-side session is gone
    let identity = jane();
    let profile = profile_for(&identity, true);
    let state = WorkflowState::evaluate(None, Some(&profile));
    assert_eq!(state, WorkflowState::Unauthenticated);
}

#[test]
fn session_without_profile_is_unverified() {
    let identity = jane();
    let state = WorkflowState::evaluate(Some(identity.clone()), None);
    assert_eq!(
        state,
        WorkflowState::AuthenticatedUnverified {
            identity: identity.clone()
        }
    );
    // This state renders the form in place
    assert_eq!(state.redirect_target(), None);
    assert_eq!(state.identity(), Some(&identity));
}

#[test]
fn session_with_unverified_profile_is_unverified() {
    let identity = jane();
    let profile = profile_for(&identity, false);
    let state = WorkflowState::evaluate(Some(identity.clone()), Some(&profile));
    assert_eq!(state, WorkflowState::AuthenticatedUnverified { identity });
}

#[test]
fn session_with_verified_profile_is_verified() {
    let identity = jane();
    let profile = profile_for(&identity, true);
    let state = WorkflowState::evaluate(Some(identity.clone()), Some(&profile));
    assert_eq!(state, WorkflowState::Verified { identity });
    assert_eq!(state.redirect_target(), Some(routes::HOME));
}

#[test]
fn submit_round_trip_success() {
    let identity = jane();
    let state = WorkflowState::evaluate(Some(identity.clone()), None);

    let submitting = state.begin_submit().unwrap();
    assert_eq!(
        submitting,
        WorkflowState::Submitting {
            identity: identity.clone()
        }
    );
    assert_eq!(submitting.redirect_target(), None);

    let verified = submitting.submit_succeeded().unwrap();
    assert_eq!(verified, WorkflowState::Verified { identity });
}

#[test]
fn failed_submit_returns_to_the_form() {
    let identity = jane();
    let submitting = WorkflowState::evaluate(Some(identity.clone()), None)
        .begin_submit()
        .unwrap();

    let back = submitting.submit_failed().unwrap();
    assert_eq!(back, WorkflowState::AuthenticatedUnverified { identity });
}

#[test]
fn begin_submit_is_illegal_without_a_session() {
    let err = WorkflowState::Unauthenticated.begin_submit().unwrap_err();
    assert_eq!(err.from, "Unauthenticated");
    assert_eq!(err.attempted, "begin_submit");
}

#[test]
fn begin_submit_is_illegal_once_verified() {
    let state = WorkflowState::Verified { identity: jane() };
    assert!(state.begin_submit().is_err());
}

#[test]
fn submit_outcomes_are_illegal_outside_submitting() {
    let unverified = WorkflowState::AuthenticatedUnverified { identity: jane() };
    assert!(unverified.clone().submit_succeeded().is_err());
    assert!(unverified.submit_failed().is_err());
}
