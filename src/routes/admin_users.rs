use actix_web::{delete as delete_route, get, http::StatusCode, post, web, HttpResponse};
use sqlx::PgPool;
use validator::ValidationErrors;

use crate::{
    admin::{
        form::render_form,
        html::{self, link_to, panel, post_button},
        index::{render_index, IndexPage},
        resources::{
            admin_user_detail_rows, admin_user_filters, admin_user_form_fields,
            admin_user_index_columns, admin_user_path, ADMIN_USERS_PATH,
        },
        table::attributes_table,
    },
    auth::{hash_password, recovery, AdminContext},
    config::Config,
    error::AppError,
    mailer::Mailer,
    models::{admin_user::message, AdminUser, AdminUserChanges, AdminUserInput},
    queries::{admin_users, AdminUserFilter, PageParams},
};

#[get("")]
pub async fn index(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    filter: web::Query<AdminUserFilter>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let rows = admin_users::list(&pool, &filter, &page).await?;
    let total = admin_users::count(&pool, &filter).await?;

    let page_config = IndexPage {
        title: "Admin Users",
        path: ADMIN_USERS_PATH,
        new_label: "New Admin User",
        columns: admin_user_index_columns(),
        row_path: |admin: &AdminUser| admin_user_path(admin.id),
        filters: admin_user_filters(),
        filter_values: serde_json::to_value(&*filter)?,
        scopes: None,
    };
    let (main, sidebar) = render_index(&page_config, &rows, &page, total);
    Ok(html::ok(html::layout(
        "Admin Users",
        Some(&ctx),
        &html::main_with_sidebar(&main, &sidebar),
    )))
}

/// Runs the model validations plus the email uniqueness check.
///
/// `existing_id` is the admin being edited, `None` on create.
async fn validate_input(
    pool: &PgPool,
    input: &AdminUserInput,
    existing_id: Option<i32>,
) -> Result<Result<AdminUserChanges, ValidationErrors>, AppError> {
    let validated = input.validate_for(existing_id.is_some());
    let taken = match &input.email {
        Some(email) => admin_users::email_taken(pool, email, existing_id).await?,
        None => false,
    };
    if !taken {
        return Ok(validated);
    }

    let mut errors = validated.err().unwrap_or_else(ValidationErrors::new);
    errors.add("email", message("taken", "has already been taken"));
    Ok(Err(errors))
}

fn form_page(
    ctx: &AdminContext,
    title: &str,
    action: &str,
    input: &AdminUserInput,
    errors: Option<&ValidationErrors>,
    status: StatusCode,
) -> HttpResponse {
    let persisted = action != ADMIN_USERS_PATH;
    let submit = if persisted {
        "Update Admin user"
    } else {
        "Create Admin user"
    };
    let form = render_form(
        action,
        "Admin User Details",
        &admin_user_form_fields(input, persisted),
        errors,
        submit,
        ADMIN_USERS_PATH,
    );
    html::page(
        status,
        html::layout(title, Some(ctx), &html::main_with_sidebar(&form, "")),
    )
}

#[get("/new")]
pub async fn new_form(ctx: AdminContext) -> HttpResponse {
    form_page(
        &ctx,
        "New Admin User",
        ADMIN_USERS_PATH,
        &AdminUserInput::default(),
        None,
        StatusCode::OK,
    )
}

/// Creates the admin and mails them reset instructions so they can choose
/// their own password. The admin is only stored once the mail has gone out.
#[post("")]
pub async fn create(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    mailer: web::Data<dyn Mailer>,
    ctx: AdminContext,
    form: web::Form<AdminUserInput>,
) -> Result<HttpResponse, AppError> {
    let changes = match validate_input(&pool, &form, None).await? {
        Ok(changes) => changes,
        Err(errors) => {
            return Ok(form_page(
                &ctx,
                "New Admin User",
                ADMIN_USERS_PATH,
                &form,
                Some(&errors),
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
    };

    let encrypted_password = match &changes.password {
        Some(password) => hash_password(password)?,
        None => String::new(),
    };
    let mut tx = pool.begin().await?;
    let admin = admin_users::insert(&mut *tx, &changes.email, &encrypted_password).await?;
    recovery::deliver_reset_password_instructions(
        &mut *tx,
        mailer.get_ref(),
        &config.app_url,
        &admin,
    )
    .await?;
    tx.commit().await?;
    Ok(html::redirect(&admin_user_path(admin.id)))
}

#[get("/{id}")]
pub async fn show(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = admin_users::find(&pool, path.into_inner()).await?;

    let path = admin_user_path(admin.id);
    let main = format!(
        "<div class=\"action_items\">{} {}</div>{}",
        link_to("Edit Admin User", &format!("{}/edit", path)),
        post_button(
            "Delete Admin User",
            &format!("{}/delete", path),
            Some("Are you sure you want to delete this?")
        ),
        panel(
            "Admin User Details",
            &attributes_table(&admin, &admin_user_detail_rows())
        ),
    );
    Ok(html::ok(html::layout(
        &admin.email,
        Some(&ctx),
        &html::main_with_sidebar(&main, ""),
    )))
}

#[get("/{id}/edit")]
pub async fn edit_form(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let admin = admin_users::find(&pool, path.into_inner()).await?;
    Ok(form_page(
        &ctx,
        "Edit Admin User",
        &admin_user_path(admin.id),
        &AdminUserInput::from(&admin),
        None,
        StatusCode::OK,
    ))
}

/// Changes the email and, when the form carries one, the password.
#[post("/{id}")]
pub async fn update(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
    form: web::Form<AdminUserInput>,
) -> Result<HttpResponse, AppError> {
    let admin = admin_users::find(&pool, path.into_inner()).await?;
    let changes = match validate_input(&pool, &form, Some(admin.id)).await? {
        Ok(changes) => changes,
        Err(errors) => {
            return Ok(form_page(
                &ctx,
                "Edit Admin User",
                &admin_user_path(admin.id),
                &form,
                Some(&errors),
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
    };

    let encrypted_password = changes.password.as_deref().map(hash_password).transpose()?;
    let admin = admin_users::update(
        &pool,
        admin.id,
        &changes.email,
        encrypted_password.as_deref(),
    )
    .await?;
    Ok(html::redirect(&admin_user_path(admin.id)))
}

/// Fails with 409 while tasks are still assigned to the admin.
#[post("/{id}/delete")]
pub async fn destroy(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    admin_users::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(ADMIN_USERS_PATH))
}

#[delete_route("/{id}")]
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    admin_users::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(ADMIN_USERS_PATH))
}
