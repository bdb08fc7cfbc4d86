//! Domain models shared across Equinox crates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical identity supplied by the identity provider.
///
/// Read-only from the workflow's perspective; refreshed each session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// KYC profile record, at most one per user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationProfile {
    pub record_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub email: String,
    /// Argon2 hash of the banking password set on the verification form
    pub password_hash: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields collected by the verification form.
///
/// Identity-sourced fields (first name, last name, email) are deliberately
/// absent; they are merged in by [`VerificationFields::from_parts`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub password: String,
}

impl ProfileInput {
    /// Wire names of fields that are empty after trimming.
    ///
    /// The form blocks submission until this is empty; the submit handler
    /// re-checks before touching the store.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        let checks: [(&'static str, &str); 7] = [
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("dateOfBirth", &self.date_of_birth),
            ("ssn", &self.ssn),
            ("password", &self.password),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Full field set written by the profile upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub password_hash: String,
}

impl VerificationFields {
    /// Merge the identity-sourced fields with the user-entered ones.
    ///
    /// Total mapping: every upsert field comes from exactly one of the two
    /// sources, never both. The banking password arrives pre-hashed so this
    /// type never holds plaintext.
    pub fn from_parts(identity: &Identity, input: &ProfileInput, password_hash: String) -> Self {
        Self {
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            email: identity.email.clone(),
            address: input.address.trim().to_string(),
            city: input.city.trim().to_string(),
            state: input.state.trim().to_string(),
            postal_code: input.postal_code.trim().to_string(),
            date_of_birth: input.date_of_birth.trim().to_string(),
            ssn: input.ssn.trim().to_string(),
            password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
        }
    }

    fn filled_input() -> ProfileInput {
        ProfileInput {
            address: "123 Main".to_string(),
            city: "Metropolis".to_string(),
            state: "CA".to_string(),
            postal_code: "90001".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            ssn: "123-45-6789".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn merge_sources_identity_fields_from_identity_only() {
        let identity = test_identity();
        let fields = VerificationFields::from_parts(&identity, &filled_input(), "h".to_string());

        assert_eq!(fields.first_name, "Jane");
        assert_eq!(fields.last_name, "Doe");
        assert_eq!(fields.email, "jane@x.com");
        assert_eq!(fields.address, "123 Main");
        assert_eq!(fields.password_hash, "h");
    }

    #[test]
    fn merge_trims_user_entered_fields() {
        let mut input = filled_input();
        input.city = "  Metropolis  ".to_string();
        let fields = VerificationFields::from_parts(&test_identity(), &input, "h".to_string());
        assert_eq!(fields.city, "Metropolis");
    }

    #[test]
    fn empty_fields_reports_blank_and_whitespace_values() {
        let mut input = filled_input();
        input.address = String::new();
        input.ssn = "   ".to_string();

        let empty = input.empty_fields();
        assert_eq!(empty, vec!["address", "ssn"]);
    }

    #[test]
    fn empty_fields_is_empty_for_complete_input() {
        assert!(filled_input().empty_fields().is_empty());
    }

    #[test]
    fn profile_serializes_with_wire_names() {
        let input = filled_input();
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("postalCode").is_some());
        assert!(json.get("dateOfBirth").is_some());
        assert!(json.get("postal_code").is_none());
    }
}
