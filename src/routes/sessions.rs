use actix_web::{get, http::header, http::StatusCode, post, web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::{
    admin::{
        form::{render_form, FormField, InputKind},
        html::{self, escape, link_to},
    },
    auth::{cleared_session_cookie, AuthService, LoginRequest},
    error::{AppError, LOGIN_PATH},
    routes::dashboard::DASHBOARD_PATH,
};

fn login_page(status: StatusCode, email: &str, alert: Option<&str>) -> HttpResponse {
    let fields = [
        FormField::new("email", "Email", InputKind::Email, email.to_string()),
        FormField::new("password", "Password", InputKind::Password, String::new()),
    ];
    let flash = alert
        .map(|alert| format!("<div class=\"flashes\">{}</div>", escape(alert)))
        .unwrap_or_default();
    let content = format!(
        "{}{}<p>{}</p>",
        flash,
        render_form(LOGIN_PATH, "Login", &fields, None, "Login", LOGIN_PATH),
        link_to("Forgot your password?", "/admin/password/new")
    );
    html::page(
        status,
        html::layout("Login", None, &html::main_with_sidebar(&content, "")),
    )
}

#[get("/login")]
pub async fn login_form() -> HttpResponse {
    login_page(StatusCode::OK, "", None)
}

/// Signs the admin in and stores the session token in the session cookie.
/// Wrong credentials re-render the form with a 401.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    auth: web::Data<AuthService>,
    credentials: web::Form<LoginRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ip = req.connection_info().realip_remote_addr().map(str::to_string);
    let email = credentials.email.clone().unwrap_or_default();

    match auth.authenticate(&pool, &credentials, ip.as_deref()).await {
        Ok(session) => Ok(HttpResponse::SeeOther()
            .cookie(auth.session_cookie(&session))
            .insert_header((header::LOCATION, DASHBOARD_PATH))
            .finish()),
        Err(AppError::Unauthorized(message)) => {
            Ok(login_page(StatusCode::UNAUTHORIZED, &email, Some(&message)))
        }
        Err(err) => Err(err),
    }
}

#[post("/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::SeeOther()
        .cookie(cleared_session_cookie())
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}
