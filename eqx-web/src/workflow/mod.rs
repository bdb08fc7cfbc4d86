//! Verification workflow state machine
//!
//! The workflow progresses through four states:
//! Unauthenticated → AuthenticatedUnverified → Submitting → Verified
//!
//! [`WorkflowState::evaluate`] is the entry point and runs on every page
//! load from the current session and store contents; no workflow state is
//! persisted client-side, so a stale browser cannot grant access after a
//! server-side session expiry. Transitions are explicit methods; an invalid
//! transition is an error, never silent state corruption.
//!
//! This module has no HTTP or rendering dependencies and is unit-testable
//! on its own.

pub mod form;

use eqx_common::models::{Identity, VerificationProfile};
use thiserror::Error;

/// Routes the workflow redirects between
pub mod routes {
    pub const SIGN_IN: &str = "/sign-in";
    pub const HOME: &str = "/";
    pub const VERIFICATION: &str = "/verification";
    pub const VERIFICATION_DETAILS: &str = "/verification/details";
}

/// Verification workflow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// No valid session
    Unauthenticated,
    /// Session present, no verified profile yet
    AuthenticatedUnverified { identity: Identity },
    /// Upsert request in flight
    Submitting { identity: Identity },
    /// Verified profile exists
    Verified { identity: Identity },
}

/// Attempted transition not legal from the current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid workflow transition: {attempted} from {from}")]
pub struct TransitionError {
    pub from: &'static str,
    pub attempted: &'static str,
}

impl WorkflowState {
    /// Evaluate the workflow entry state from the current session and the
    /// store's profile record.
    pub fn evaluate(
        identity: Option<Identity>,
        profile: Option<&VerificationProfile>,
    ) -> WorkflowState {
        let Some(identity) = identity else {
            return WorkflowState::Unauthenticated;
        };

        match profile {
            Some(p) if p.is_verified => WorkflowState::Verified { identity },
            _ => WorkflowState::AuthenticatedUnverified { identity },
        }
    }

    /// Form submission starts; legal only while authenticated-unverified.
    pub fn begin_submit(self) -> Result<WorkflowState, TransitionError> {
        match self {
            WorkflowState::AuthenticatedUnverified { identity } => {
                Ok(WorkflowState::Submitting { identity })
            }
            other => Err(other.illegal("begin_submit")),
        }
    }

    /// Upsert succeeded; the user is now verified.
    pub fn submit_succeeded(self) -> Result<WorkflowState, TransitionError> {
        match self {
            WorkflowState::Submitting { identity } => Ok(WorkflowState::Verified { identity }),
            other => Err(other.illegal("submit_succeeded")),
        }
    }

    /// Upsert failed; return to the form with no state advanced.
    pub fn submit_failed(self) -> Result<WorkflowState, TransitionError> {
        match self {
            WorkflowState::Submitting { identity } => {
                Ok(WorkflowState::AuthenticatedUnverified { identity })
            }
            other => Err(other.illegal("submit_failed")),
        }
    }

    /// Route this state redirects to, or None when it renders in place
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            WorkflowState::Unauthenticated => Some(routes::SIGN_IN),
            WorkflowState::Verified { .. } => Some(routes::HOME),
            WorkflowState::AuthenticatedUnverified { .. } | WorkflowState::Submitting { .. } => {
                None
            }
        }
    }

    /// Identity attached to this state, if authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            WorkflowState::Unauthenticated => None,
            WorkflowState::AuthenticatedUnverified { identity }
            | WorkflowState::Submitting { identity }
            | WorkflowState::Verified { identity } => Some(identity),
        }
    }

    /// State name for logging and transition errors
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Unauthenticated => "Unauthenticated",
            WorkflowState::AuthenticatedUnverified { .. } => "AuthenticatedUnverified",
            WorkflowState::Submitting { .. } => "Submitting",
            WorkflowState::Verified { .. } => "Verified",
        }
    }

    fn illegal(self, attempted: &'static str) -> TransitionError {
        TransitionError {
            from: self.name(),
            attempted,
        }
    }
}
