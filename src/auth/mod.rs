//! Admin authentication.
//!
//! `AuthService` is the one entry point handlers use: it checks credentials,
//! records the sign-in and issues a session token. `AuthMiddleware` verifies
//! that token on every admin request and `AdminContext` hands the signed-in
//! admin to handlers.

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod recovery;
pub mod token;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::error::AppError;
use crate::forms::{blank_as_none, empty_as_none};
use crate::queries::admin_users;

pub use extractors::AdminContext;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

/// Shown for every failed login, whatever the reason.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Login form parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "can't be blank"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing)]
    #[validate(required(message = "can't be blank"))]
    pub password: Option<String>,
}

/// A successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub admin_user_id: i32,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies admin sessions.
#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    ttl_hours: i64,
}

impl AuthService {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.session_ttl_hours)
    }

    /// Checks the credentials and, when they match, records the sign-in and
    /// returns a new session. Any mismatch is `AppError::Unauthorized`.
    pub async fn authenticate(
        &self,
        pool: &PgPool,
        credentials: &LoginRequest,
        ip: Option<&str>,
    ) -> Result<Session, AppError> {
        let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.into());
        let (email, password) = match (&credentials.email, &credentials.password) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(invalid()),
        };

        let admin = admin_users::find_by_email(pool, email)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(password, &admin.encrypted_password)? {
            log::warn!("failed sign-in for admin {}", admin.id);
            return Err(invalid());
        }

        let now = Utc::now();
        admin_users::record_sign_in(pool, admin.id, ip, now).await?;
        log::info!("admin {} signed in", admin.id);
        self.issue(admin.id, &admin.email, now)
    }

    pub fn issue(
        &self,
        admin_user_id: i32,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        Ok(Session {
            token: generate_token(admin_user_id, email, &self.secret, self.ttl_hours)?,
            admin_user_id,
            email: email.to_string(),
            expires_at: now + Duration::hours(self.ttl_hours),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        verify_token(token, &self.secret)
    }

    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, session.token.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::hours(self.ttl_hours))
            .finish()
    }
}

/// An expired cookie that makes the browser drop the session.
pub fn cleared_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_validation() {
        let valid: LoginRequest = serde_json::from_value(json!({
            "email": "a@b.com",
            "password": "password123"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());

        let missing_password: LoginRequest =
            serde_json::from_value(json!({ "email": "a@b.com", "password": "" })).unwrap();
        assert!(missing_password.validate().is_err());
    }

    #[test]
    fn test_issued_session_verifies() {
        let auth = AuthService::new("test_secret", 8);
        let now = Utc::now();
        let session = auth.issue(5, "a@b.com", now).unwrap();
        assert_eq!(session.expires_at, now + Duration::hours(8));

        let claims = auth.verify(&session.token).unwrap();
        assert_eq!(claims.sub, 5);
        assert_eq!(claims.email, "a@b.com");

        let other = AuthService::new("other_secret", 8);
        assert!(other.verify(&session.token).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let auth = AuthService::new("test_secret", 8);
        let session = auth.issue(5, "a@b.com", Utc::now()).unwrap();
        let cookie = auth.session_cookie(&session);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), session.token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        let cleared = cleared_session_cookie();
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
    }
}
