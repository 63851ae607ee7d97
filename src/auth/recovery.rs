//! Password recovery: reset tokens, the instructions mail and resetting by token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::forms::{blank_as_none, empty_as_none};
use crate::mailer::Mailer;
use crate::models::admin_user::{check_password, message};
use crate::models::AdminUser;
use crate::queries::admin_users;

/// Reset links stop working this long after they were sent.
pub const RESET_PASSWORD_WITHIN_HOURS: i64 = 6;

pub const RESET_PATH: &str = "/admin/password/edit";

pub fn new_reset_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn reset_url(app_url: &str, token: &str) -> String {
    format!("{}{}?reset_password_token={}", app_url, RESET_PATH, token)
}

pub fn token_is_fresh(sent_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    sent_at.map_or(false, |sent_at| {
        now < sent_at + Duration::hours(RESET_PASSWORD_WITHIN_HOURS)
    })
}

/// Stores a fresh reset token on the admin and mails them the reset link.
/// Any earlier token stops working. The token is kept only if the mail went out.
pub async fn send_reset_password_instructions(
    pool: &PgPool,
    mailer: &dyn Mailer,
    app_url: &str,
    admin: &AdminUser,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    deliver_reset_password_instructions(&mut *tx, mailer, app_url, admin).await?;
    tx.commit().await?;
    Ok(())
}

/// Same as `send_reset_password_instructions`, on the caller's connection.
/// Nothing is committed here; a mailer error leaves the caller's transaction
/// to roll back.
pub async fn deliver_reset_password_instructions(
    conn: &mut PgConnection,
    mailer: &dyn Mailer,
    app_url: &str,
    admin: &AdminUser,
) -> Result<(), AppError> {
    let token = new_reset_token();
    admin_users::set_reset_password_token(conn, admin.id, &token, Utc::now()).await?;
    mailer.send_reset_password_instructions(&admin.email, &reset_url(app_url, &token))?;
    log::info!("sent reset password instructions to admin {}", admin.id);
    Ok(())
}

/// Parameters of the "change your password" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPasswordInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    pub password_confirmation: Option<String>,
}

#[derive(Debug)]
pub enum ResetOutcome {
    Reset(AdminUser),
    Rejected(ValidationErrors),
}

/// Sets a new password for the admin holding `input.reset_password_token`.
///
/// The token must exist and be fresh; it is consumed on success.
pub async fn reset_password_by_token(
    pool: &PgPool,
    input: &ResetPasswordInput,
    now: DateTime<Utc>,
) -> Result<ResetOutcome, AppError> {
    let mut errors = ValidationErrors::new();

    let admin = match &input.reset_password_token {
        Some(token) => admin_users::find_by_reset_password_token(pool, token).await?,
        None => None,
    };
    let admin = match admin {
        Some(admin) if token_is_fresh(admin.reset_password_sent_at, now) => admin,
        Some(_) => {
            errors.add(
                "reset_password_token",
                message("expired", "has expired, please request a new one"),
            );
            return Ok(ResetOutcome::Rejected(errors));
        }
        None => {
            errors.add("reset_password_token", message("invalid", "is invalid"));
            return Ok(ResetOutcome::Rejected(errors));
        }
    };

    check_password(
        input.password.as_deref(),
        input.password_confirmation.as_deref(),
        &mut errors,
    );
    let password = match (&input.password, errors.errors().is_empty()) {
        (Some(password), true) => password,
        _ => return Ok(ResetOutcome::Rejected(errors)),
    };

    admin_users::reset_password(pool, admin.id, &hash_password(password)?).await?;
    log::info!("admin {} reset their password", admin.id);
    Ok(ResetOutcome::Reset(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reset_tokens_are_unique_hex() {
        let first = new_reset_token();
        let second = new_reset_token();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_reset_url() {
        assert_eq!(
            reset_url("https://admin.example.com", "abc"),
            "https://admin.example.com/admin/password/edit?reset_password_token=abc"
        );
    }

    #[test]
    fn test_tokens_expire_after_six_hours() {
        let sent = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
        assert!(token_is_fresh(Some(sent), sent + Duration::hours(5)));
        assert!(!token_is_fresh(Some(sent), sent + Duration::hours(6)));
        assert!(!token_is_fresh(None, sent));
    }
}
