use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::{AuthService, SESSION_COOKIE};
use crate::error::AppError;
use crate::queries::admin_users;

/// Paths under `/admin` reachable without a session.
const PUBLIC_PATHS: [&str; 2] = ["/admin/login", "/admin/password"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path == *public
            || path
                .strip_prefix(public)
                .map_or(false, |rest| rest.starts_with('/'))
    })
}

/// Requires a valid admin session on every wrapped route except the login and
/// password recovery pages.
///
/// The session token is read from the `admin_session` cookie, falling back to an
/// `Authorization: Bearer` header. A verified token only counts while its admin
/// still exists; the admin's current email replaces the one in the token, and
/// the resulting `Claims` are stored in the request extensions for the
/// `AdminContext` extractor.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public_path(req.path()) {
            return Box::pin(self.service.call(req));
        }

        let auth = req.app_data::<web::Data<AuthService>>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let auth = auth.ok_or_else(|| {
                AppError::InternalServerError("AuthService is not configured".into())
            })?;
            let token = session_token(&req)
                .ok_or_else(|| AppError::Unauthorized("Missing session".into()))?;
            let mut claims = auth.verify(&token).map_err(|app_err| {
                log::debug!("rejected session on {}: {}", req.path(), app_err);
                app_err
            })?;

            let pool = pool.ok_or_else(|| {
                AppError::InternalServerError("Database pool is not configured".into())
            })?;
            let admin = admin_users::find_optional(&pool, claims.sub)
                .await?
                .ok_or_else(|| {
                    log::info!("session for deleted admin {} rejected", claims.sub);
                    AppError::Unauthorized("Admin no longer exists".into())
                })?;
            claims.email = admin.email;

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

/// The session token from the cookie, or else from a Bearer header.
fn session_token(req: &ServiceRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/admin/login"));
        assert!(is_public_path("/admin/password"));
        assert!(is_public_path("/admin/password/new"));
        assert!(is_public_path("/admin/password/edit"));
        assert!(!is_public_path("/admin/passwords_dump"));
        assert!(!is_public_path("/admin/dashboard"));
        assert!(!is_public_path("/admin/logout"));
        assert!(!is_public_path("/admin/tasks"));
    }
}
