//! Verification form field descriptors
//!
//! One descriptor per profile field. Identity-sourced fields carry their
//! identity values and are read-only; editable fields are prefilled from an
//! existing profile when one exists. The password is never prefilled.

use eqx_common::models::{Identity, VerificationProfile};
use serde::Serialize;

/// One form field as rendered by the verification page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Wire name, matches the submit payload key
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Prefilled value
    pub value: String,
    /// Sourced from the identity provider, not editable
    pub read_only: bool,
    /// Rendered as a password input, never echoed back
    pub secret: bool,
}

impl FormField {
    fn identity(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            value: value.to_string(),
            read_only: true,
            secret: false,
        }
    }

    fn editable(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            name,
            label,
            value: value.to_string(),
            read_only: false,
            secret: false,
        }
    }
}

/// Build the full field list for the verification form
pub fn form_fields(identity: &Identity, existing: Option<&VerificationProfile>) -> Vec<FormField> {
    let prefill = |field: fn(&VerificationProfile) -> &String| -> &str {
        existing.map(|p| field(p).as_str()).unwrap_or("")
    };

    vec![
        FormField::identity("firstName", "First Name", &identity.first_name),
        FormField::identity("lastName", "Last Name", &identity.last_name),
        FormField::identity("email", "Email", &identity.email),
        FormField::editable("address", "Address", prefill(|p| &p.address)),
        FormField::editable("city", "City", prefill(|p| &p.city)),
        FormField::editable("state", "State", prefill(|p| &p.state)),
        FormField::editable("postalCode", "Postal Code", prefill(|p| &p.postal_code)),
        FormField::editable("dateOfBirth", "Date of Birth", prefill(|p| &p.date_of_birth)),
        FormField::editable("ssn", "SSN", prefill(|p| &p.ssn)),
        FormField {
            name: "password",
            label: "Banking Password",
            value: String::new(),
            read_only: false,
            secret: true,
        },
    ]
}
