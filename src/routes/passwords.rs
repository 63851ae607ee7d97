//! Forgotten password flow: request a reset link, then choose a new password
//! through it.

use actix_web::{get, http::header, http::StatusCode, post, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use validator::ValidationErrors;

use crate::{
    admin::{
        form::{field_messages, render_form, FormField, InputKind},
        html::{self, escape, link_to},
    },
    auth::{
        recovery::{self, ResetOutcome, ResetPasswordInput},
        AuthService,
    },
    config::Config,
    error::{AppError, LOGIN_PATH},
    forms::blank_as_none,
    mailer::Mailer,
    queries::admin_users,
    routes::dashboard::DASHBOARD_PATH,
};

/// Shown whether or not the address belongs to an admin.
pub const INSTRUCTIONS_SENT: &str = "If your email address exists in our database, you will \
     receive a password recovery link at your email address in a few minutes.";

#[derive(Debug, Default, Deserialize)]
pub struct PasswordRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
}

fn public_page(title: &str, status: StatusCode, notice: Option<&str>, body: &str) -> HttpResponse {
    let notice = notice
        .map(|notice| format!("<div class=\"flashes\">{}</div>", escape(notice)))
        .unwrap_or_default();
    let content = format!("{}{}<p>{}</p>", notice, body, link_to("Sign in", LOGIN_PATH));
    html::page(
        status,
        html::layout(title, None, &html::main_with_sidebar(&content, "")),
    )
}

fn request_form() -> String {
    let fields = [FormField::new("email", "Email", InputKind::Email, String::new())];
    render_form(
        "/admin/password/new",
        "Forgot your password?",
        &fields,
        None,
        "Reset My Password",
        LOGIN_PATH,
    )
}

fn reset_form(token: &str, errors: Option<&ValidationErrors>) -> String {
    let fields = [
        FormField::new("reset_password_token", "", InputKind::Hidden, token.to_string()),
        FormField::new("password", "New Password", InputKind::Password, String::new()),
        FormField::new(
            "password_confirmation",
            "Confirm New Password",
            InputKind::Password,
            String::new(),
        ),
    ];
    render_form(
        "/admin/password",
        "Change your password",
        &fields,
        errors,
        "Change my password",
        LOGIN_PATH,
    )
}

#[get("/new")]
pub async fn new_form() -> HttpResponse {
    public_page("Forgot your password?", StatusCode::OK, None, &request_form())
}

/// Mails reset instructions when the email belongs to an admin. The response
/// is the same either way.
#[post("/new")]
pub async fn send_instructions(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<dyn Mailer>,
    form: web::Form<PasswordRequest>,
) -> Result<HttpResponse, AppError> {
    if let Some(email) = &form.email {
        match admin_users::find_by_email(&pool, email).await? {
            Some(admin) => {
                recovery::send_reset_password_instructions(
                    &pool,
                    mailer.get_ref(),
                    &config.app_url,
                    &admin,
                )
                .await?
            }
            None => log::info!("password reset requested for an unknown email"),
        }
    }
    Ok(public_page(
        "Forgot your password?",
        StatusCode::OK,
        Some(INSTRUCTIONS_SENT),
        &request_form(),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetTokenQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reset_password_token: Option<String>,
}

#[get("/edit")]
pub async fn edit_form(query: web::Query<ResetTokenQuery>) -> Result<HttpResponse, AppError> {
    let token = query.reset_password_token.as_deref().ok_or_else(|| {
        AppError::BadRequest(
            "You can't access this page without coming from a password reset email.".into(),
        )
    })?;
    Ok(public_page(
        "Change your password",
        StatusCode::OK,
        None,
        &reset_form(token, None),
    ))
}

/// Sets the new password and signs the admin in. A missing, unknown or
/// expired token, or a rejected password, re-renders the form with a 422.
#[post("")]
pub async fn reset(
    pool: web::Data<PgPool>,
    auth: web::Data<AuthService>,
    form: web::Form<ResetPasswordInput>,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    match recovery::reset_password_by_token(&pool, &form, now).await? {
        ResetOutcome::Reset(admin) => {
            let session = auth.issue(admin.id, &admin.email, now)?;
            Ok(HttpResponse::SeeOther()
                .cookie(auth.session_cookie(&session))
                .insert_header((header::LOCATION, DASHBOARD_PATH))
                .finish())
        }
        ResetOutcome::Rejected(errors) => {
            let token_messages = field_messages(Some(&errors), "reset_password_token");
            let notice = (!token_messages.is_empty())
                .then(|| format!("Reset password token {}", token_messages.join(", ")));
            Ok(public_page(
                "Change your password",
                StatusCode::UNPROCESSABLE_ENTITY,
                notice.as_deref(),
                &reset_form(
                    form.reset_password_token.as_deref().unwrap_or_default(),
                    Some(&errors),
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_edit_form_requires_token() {
        let app =
            test::init_service(App::new().service(web::scope("/password").service(edit_form)))
                .await;

        let req = test::TestRequest::get().uri("/password/edit").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/password/edit?reset_password_token=abc123")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("name=\"reset_password_token\" value=\"abc123\""));
        assert!(html.contains("name=\"password_confirmation\""));
    }

    #[actix_web::test]
    async fn test_request_form_renders() {
        let app =
            test::init_service(App::new().service(web::scope("/password").service(new_form)))
                .await;

        let req = test::TestRequest::get().uri("/password/new").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("action=\"/admin/password/new\""));
    }
}
