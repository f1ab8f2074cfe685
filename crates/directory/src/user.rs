use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use users_core::UserId;

/// A stored user record.
///
/// `id` and `created_at` are assigned once at creation and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. Every field is required; absence is reported by
/// validation rather than by deserialization so callers get a readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default, alias = "FirstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "LastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
}

/// Partial update. `None` and blank strings both mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, alias = "FirstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "LastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
}

/// Trimmed value of an optional field, or `None` when absent or blank.
pub(crate) fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl User {
    /// Build a new record from an already validated create request.
    pub fn create(id: UserId, request: &CreateUserRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: supplied(&request.first_name).unwrap_or_default().to_string(),
            last_name: supplied(&request.last_name).unwrap_or_default().to_string(),
            email: supplied(&request.email).unwrap_or_default().to_string(),
            created_at,
        }
    }

    /// Copy of this record with the supplied, non-blank request fields applied.
    pub fn with_changes(&self, request: &UpdateUserRequest) -> Self {
        Self {
            id: self.id,
            first_name: supplied(&request.first_name)
                .map_or_else(|| self.first_name.clone(), str::to_string),
            last_name: supplied(&request.last_name)
                .map_or_else(|| self.last_name.clone(), str::to_string),
            email: supplied(&request.email).map_or_else(|| self.email.clone(), str::to_string),
            created_at: self.created_at,
        }
    }

    /// Case-insensitive substring match on names and email.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: UserId::new(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_trims_fields() {
        let req = CreateUserRequest {
            first_name: Some("  Bob ".to_string()),
            last_name: Some("Jones\t".to_string()),
            email: Some(" bob@x.com ".to_string()),
        };
        let user = User::create(UserId::new(), &req, Utc::now());
        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.last_name, "Jones");
        assert_eq!(user.email, "bob@x.com");
    }

    #[test]
    fn with_changes_only_touches_supplied_fields() {
        let user = alice();
        let updated = user.with_changes(&UpdateUserRequest {
            first_name: None,
            last_name: Some("   ".to_string()),
            email: Some("alice.smith@example.com".to_string()),
        });

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(updated.first_name, "Alice");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.email, "alice.smith@example.com");
    }

    #[test]
    fn matches_is_case_insensitive_across_fields() {
        let user = alice();
        assert!(user.matches("ali"));
        assert!(user.matches("smi"));
        assert!(user.matches("example.com"));
        assert!(!user.matches("bob"));
    }

    #[test]
    fn has_email_ignores_case() {
        assert!(alice().has_email("ALICE@Example.com"));
        assert!(!alice().has_email("alice@example.org"));
    }

    #[test]
    fn requests_accept_pascal_case_fields() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"FirstName":"Bob","LastName":"Jones","Email":"bob@x.com"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Bob"));
        assert_eq!(req.email.as_deref(), Some("bob@x.com"));

        let req: UpdateUserRequest = serde_json::from_str(r#"{"email":"b@x.com"}"#).unwrap();
        assert_eq!(req.first_name, None);
        assert_eq!(req.email.as_deref(), Some("b@x.com"));
    }

    #[test]
    fn user_serializes_camel_case() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["firstName"], "Alice");
        assert!(json.get("createdAt").is_some());
    }
}
