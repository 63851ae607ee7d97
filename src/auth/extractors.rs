use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use std::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::AppError;

/// The signed-in admin and the instant the request is evaluated at.
///
/// Handlers pass this into queries and renderers explicitly; time-based scopes
/// read `now` from here rather than the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminContext {
    pub admin_user_id: i32,
    pub email: String,
    pub now: DateTime<Utc>,
}

impl AdminContext {
    pub fn from_claims(claims: &Claims, now: DateTime<Utc>) -> Self {
        Self {
            admin_user_id: claims.sub,
            email: claims.email.clone(),
            now,
        }
    }
}

/// Builds the context from the `Claims` that `AuthMiddleware` stored in the
/// request extensions.
impl FromRequest for AdminContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AdminContext::from_claims(claims, Utc::now()))),
            None => {
                let err = AppError::Unauthorized(
                    "No admin session on request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
