//! Request validation against a point-in-time view of the store.
//!
//! Both validators are pure. Uniqueness is checked against the users passed in,
//! so a concurrent write between validation and insert is not detected.

use users_core::{DomainError, DomainResult, UserId};
use validator::ValidateEmail;

use crate::user::{CreateUserRequest, UpdateUserRequest, User, supplied};

/// Maximum length of first and last names, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a create request against the current users.
pub fn validate_create(request: Option<&CreateUserRequest>, users: &[User]) -> DomainResult<()> {
    let request = request.ok_or_else(|| DomainError::validation("Request body is required."))?;

    let first_name = supplied(&request.first_name)
        .ok_or_else(|| DomainError::validation("FirstName is required."))?;
    check_name_length("FirstName", first_name)?;

    let last_name = supplied(&request.last_name)
        .ok_or_else(|| DomainError::validation("LastName is required."))?;
    check_name_length("LastName", last_name)?;

    let email =
        supplied(&request.email).ok_or_else(|| DomainError::validation("Email is required."))?;
    check_email_format(email)?;

    if users.iter().any(|u| u.has_email(email)) {
        return Err(email_taken());
    }

    Ok(())
}

/// Validate a partial update for `target` against the current users.
///
/// Absent or blank fields are skipped; they leave the stored value untouched.
pub fn validate_update(
    request: Option<&UpdateUserRequest>,
    users: &[User],
    target: UserId,
) -> DomainResult<()> {
    let request = request.ok_or_else(|| DomainError::validation("Request body is required."))?;

    if let Some(first_name) = supplied(&request.first_name) {
        check_name_length("FirstName", first_name)?;
    }

    if let Some(last_name) = supplied(&request.last_name) {
        check_name_length("LastName", last_name)?;
    }

    if let Some(email) = supplied(&request.email) {
        check_email_format(email)?;
        if users.iter().any(|u| u.id != target && u.has_email(email)) {
            return Err(email_taken());
        }
    }

    Ok(())
}

fn check_name_length(field: &str, value: &str) -> DomainResult<()> {
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters."
        )));
    }
    Ok(())
}

fn check_email_format(email: &str) -> DomainResult<()> {
    if !email.to_string().validate_email() {
        return Err(DomainError::validation("Email is not a valid email address."));
    }
    Ok(())
}

fn email_taken() -> DomainError {
    DomainError::validation("Email is already in use.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(first: &str, last: &str, email: &str) -> User {
        User {
            id: UserId::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        }
    }

    fn create(first: &str, last: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(email.to_string()),
        }
    }

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_create() {
        assert_eq!(validate_create(Some(&create("Bob", "Jones", "bob@x.com")), &[]), Ok(()));
    }

    #[test]
    fn rejects_missing_body() {
        let err = validate_create(None, &[]).unwrap_err();
        assert_eq!(message(err), "Request body is required.");

        let err = validate_update(None, &[], UserId::new()).unwrap_err();
        assert_eq!(message(err), "Request body is required.");
    }

    #[test]
    fn rejects_blank_names() {
        let err = validate_create(Some(&create("   ", "Jones", "bob@x.com")), &[]).unwrap_err();
        assert_eq!(message(err), "FirstName is required.");

        let mut req = create("Bob", "Jones", "bob@x.com");
        req.last_name = None;
        let err = validate_create(Some(&req), &[]).unwrap_err();
        assert_eq!(message(err), "LastName is required.");
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        let exactly = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_create(Some(&create(&exactly, "Jones", "bob@x.com")), &[]).is_ok());

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_create(Some(&create("Bob", &too_long, "bob@x.com")), &[]).unwrap_err();
        assert_eq!(message(err), "LastName must be at most 100 characters.");
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["bob", "bob@", "@x.com", "bob at x.com"] {
            let err = validate_create(Some(&create("Bob", "Jones", bad)), &[]).unwrap_err();
            assert_eq!(message(err), "Email is not a valid email address.", "{bad}");
        }
    }

    #[test]
    fn email_uniqueness_ignores_case() {
        let existing = vec![user("Bob", "Jones", "bob@x.com")];
        let err =
            validate_create(Some(&create("Rob", "Jones", "BOB@X.COM")), &existing).unwrap_err();
        assert_eq!(message(err), "Email is already in use.");
    }

    #[test]
    fn update_allows_resubmitting_own_email() {
        let target = user("Bob", "Jones", "bob@x.com");
        let users = vec![target.clone(), user("Alice", "Smith", "alice@example.com")];

        let req = UpdateUserRequest {
            email: Some("Bob@X.com".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_update(Some(&req), &users, target.id), Ok(()));

        let req = UpdateUserRequest {
            email: Some("alice@EXAMPLE.com".to_string()),
            ..Default::default()
        };
        let err = validate_update(Some(&req), &users, target.id).unwrap_err();
        assert_eq!(message(err), "Email is already in use.");
    }

    #[test]
    fn update_skips_blank_fields_but_checks_present_ones() {
        let target = user("Bob", "Jones", "bob@x.com");
        let users = vec![target.clone()];

        let req = UpdateUserRequest {
            first_name: Some(" ".to_string()),
            last_name: None,
            email: Some(String::new()),
        };
        assert_eq!(validate_update(Some(&req), &users, target.id), Ok(()));

        let req = UpdateUserRequest {
            first_name: Some("x".repeat(MAX_NAME_LENGTH + 1)),
            ..Default::default()
        };
        let err = validate_update(Some(&req), &users, target.id).unwrap_err();
        assert_eq!(message(err), "FirstName must be at most 100 characters.");

        let req = UpdateUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        let err = validate_update(Some(&req), &users, target.id).unwrap_err();
        assert_eq!(message(err), "Email is not a valid email address.");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any two emails that differ only in case collide.
            #[test]
            fn case_variants_of_an_email_collide(local in "[a-z]{1,12}", domain in "[a-z]{1,12}") {
                let email = format!("{local}@{domain}.com");
                let existing = vec![user("Bob", "Jones", &email)];
                let req = create("Other", "Person", &email.to_uppercase());
                prop_assert!(validate_create(Some(&req), &existing).is_err());
            }

            /// Property: names up to the limit pass, longer ones fail.
            #[test]
            fn name_limit_is_inclusive(len in 1usize..=150) {
                let name = "n".repeat(len);
                let result = validate_create(Some(&create(&name, "Jones", "bob@x.com")), &[]);
                prop_assert_eq!(result.is_ok(), len <= MAX_NAME_LENGTH);
            }
        }
    }
}
