use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::forms::{blank_as_none, empty_as_none};

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// An admin who operates the interface and can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    pub reset_password_sent_at: Option<DateTime<Utc>>,
    pub sign_in_count: i32,
    pub current_sign_in_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub current_sign_in_ip: Option<String>,
    pub last_sign_in_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// An admin created without a password cannot sign in until they reset it.
    pub fn has_password(&self) -> bool {
        !self.encrypted_password.is_empty()
    }
}

/// Admin user form parameters.
///
/// The form exposes the email only; password and confirmation are accepted so
/// an existing admin's password can be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUserInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "can't be blank"),
        email(message = "is invalid")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    pub password_confirmation: Option<String>,
}

/// A validated admin user change.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUserChanges {
    pub email: String,
    /// Plain-text password to hash and store, when one was supplied.
    pub password: Option<String>,
}

impl AdminUserInput {
    /// Whether password rules apply.
    ///
    /// A new admin never needs a password. An existing admin only needs one
    /// when the form is changing it.
    pub fn password_required(&self, persisted: bool) -> bool {
        persisted && (self.password.is_some() || self.password_confirmation.is_some())
    }

    /// Validates the input for a new (`persisted == false`) or existing admin.
    pub fn validate_for(&self, persisted: bool) -> Result<AdminUserChanges, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.password_required(persisted) || self.password.is_some() {
            check_password(
                self.password.as_deref(),
                self.password_confirmation.as_deref(),
                &mut errors,
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }
        match &self.email {
            Some(email) => Ok(AdminUserChanges {
                email: email.clone(),
                password: self.password.clone(),
            }),
            None => Err(errors),
        }
    }
}

impl From<&AdminUser> for AdminUserInput {
    fn from(admin: &AdminUser) -> Self {
        Self {
            email: Some(admin.email.clone()),
            password: None,
            password_confirmation: None,
        }
    }
}

/// Adds the password rules' errors to `errors`: present, 6..=128 characters,
/// and equal to its confirmation.
pub fn check_password(
    password: Option<&str>,
    confirmation: Option<&str>,
    errors: &mut ValidationErrors,
) {
    let password = match password {
        Some(password) => password,
        None => {
            errors.add("password", message("presence", "can't be blank"));
            return;
        }
    };

    let length = password.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        errors.add(
            "password",
            message(
                "length",
                format!("is too short (minimum is {} characters)", PASSWORD_MIN_LENGTH),
            ),
        );
    } else if length > PASSWORD_MAX_LENGTH {
        errors.add(
            "password",
            message(
                "length",
                format!("is too long (maximum is {} characters)", PASSWORD_MAX_LENGTH),
            ),
        );
    }
    if confirmation != Some(password) {
        errors.add(
            "password_confirmation",
            message("confirmation", "doesn't match Password"),
        );
    }
}

/// Builds a `ValidationError` with a human readable message.
pub fn message(code: &'static str, text: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(text.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: Option<&str>, confirmation: Option<&str>) -> AdminUserInput {
        AdminUserInput {
            email: Some(email.to_string()),
            password: password.map(str::to_string),
            password_confirmation: confirmation.map(str::to_string),
        }
    }

    #[test]
    fn test_create_without_password_is_valid() {
        let changes = input("a@b.com", None, None).validate_for(false).unwrap();
        assert_eq!(changes.email, "a@b.com");
        assert!(changes.password.is_none());
    }

    #[test]
    fn test_email_must_be_present_and_well_formed() {
        let missing = AdminUserInput::default().validate_for(false).unwrap_err();
        assert_eq!(
            missing.field_errors()["email"][0].message.as_deref(),
            Some("can't be blank")
        );

        let malformed = input("not-an-email", None, None)
            .validate_for(false)
            .unwrap_err();
        assert_eq!(
            malformed.field_errors()["email"][0].message.as_deref(),
            Some("is invalid")
        );
    }

    #[test]
    fn test_update_without_password_fields_is_valid() {
        assert!(input("a@b.com", None, None).validate_for(true).is_ok());
    }

    #[test]
    fn test_update_with_confirmation_only_requires_password() {
        let errors = input("a@b.com", None, Some("secret123"))
            .validate_for(true)
            .unwrap_err();
        assert_eq!(
            errors.field_errors()["password"][0].message.as_deref(),
            Some("can't be blank")
        );
    }

    #[test]
    fn test_update_password_rules() {
        let short = input("a@b.com", Some("abc"), Some("abc"))
            .validate_for(true)
            .unwrap_err();
        assert!(short.field_errors().contains_key("password"));

        let mismatch = input("a@b.com", Some("secret123"), Some("secret124"))
            .validate_for(true)
            .unwrap_err();
        assert_eq!(
            mismatch.field_errors()["password_confirmation"][0]
                .message
                .as_deref(),
            Some("doesn't match Password")
        );

        let changes = input("a@b.com", Some("secret123"), Some("secret123"))
            .validate_for(true)
            .unwrap();
        assert_eq!(changes.password.as_deref(), Some("secret123"));
    }

    #[test]
    fn test_password_required_only_for_persisted_admins() {
        let with_password = input("a@b.com", Some("secret123"), None);
        assert!(!with_password.password_required(false));
        assert!(with_password.password_required(true));
        assert!(!input("a@b.com", None, None).password_required(true));
    }
}
