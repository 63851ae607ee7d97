use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::AdminUser,
    queries::{AdminUserFilter, PageParams},
};

const ADMIN_USER_COLUMNS: &str = "id, email, encrypted_password, reset_password_token, \
     reset_password_sent_at, sign_in_count, current_sign_in_at, last_sign_in_at, \
     current_sign_in_ip, last_sign_in_ip, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    filter: &AdminUserFilter,
    page: &PageParams,
) -> Result<Vec<AdminUser>, AppError> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM admin_users WHERE TRUE",
        ADMIN_USER_COLUMNS
    ));
    filter.push_conditions(&mut query);
    query.push(" ORDER BY id DESC");
    page.push_limit(&mut query);
    Ok(query.build_query_as::<AdminUser>().fetch_all(pool).await?)
}

pub async fn count(pool: &PgPool, filter: &AdminUserFilter) -> Result<i64, AppError> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM admin_users WHERE TRUE");
    filter.push_conditions(&mut query);
    Ok(query.build_query_scalar::<i64>().fetch_one(pool).await?)
}

/// `(id, email)` pairs for select inputs, ordered by email.
pub async fn options(pool: &PgPool) -> Result<Vec<(i32, String)>, AppError> {
    Ok(
        sqlx::query_as("SELECT id, email FROM admin_users ORDER BY email, id")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn find(pool: &PgPool, id: i32) -> Result<AdminUser, AppError> {
    find_optional(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Admin user {} not found", id)))
}

pub async fn find_optional(pool: &PgPool, id: i32) -> Result<Option<AdminUser>, AppError> {
    Ok(sqlx::query_as::<_, AdminUser>(&format!(
        "SELECT {} FROM admin_users WHERE id = $1",
        ADMIN_USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

/// Emails compare case-insensitively.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminUser>, AppError> {
    Ok(sqlx::query_as::<_, AdminUser>(&format!(
        "SELECT {} FROM admin_users WHERE LOWER(email) = LOWER($1)",
        ADMIN_USER_COLUMNS
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?)
}

/// True when another admin (not `except_id`) already uses `email`.
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    except_id: Option<i32>,
) -> Result<bool, AppError> {
    let (taken,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM admin_users \
         WHERE LOWER(email) = LOWER($1) AND ($2::INTEGER IS NULL OR id <> $2))",
    )
    .bind(email.trim())
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(taken)
}

/// Inserts an admin. `encrypted_password` is empty for admins created without a password.
pub async fn insert(
    conn: &mut PgConnection,
    email: &str,
    encrypted_password: &str,
) -> Result<AdminUser, AppError> {
    let admin = sqlx::query_as::<_, AdminUser>(&format!(
        "INSERT INTO admin_users (email, encrypted_password) VALUES ($1, $2) RETURNING {}",
        ADMIN_USER_COLUMNS
    ))
    .bind(email.trim())
    .bind(encrypted_password)
    .fetch_one(conn)
    .await?;

    log::info!("created admin user {}", admin.id);
    Ok(admin)
}

/// Updates the email and, when `encrypted_password` is given, the password.
pub async fn update(
    pool: &PgPool,
    id: i32,
    email: &str,
    encrypted_password: Option<&str>,
) -> Result<AdminUser, AppError> {
    let admin = sqlx::query_as::<_, AdminUser>(&format!(
        "UPDATE admin_users \
         SET email = $1, encrypted_password = COALESCE($2, encrypted_password), updated_at = NOW() \
         WHERE id = $3 RETURNING {}",
        ADMIN_USER_COLUMNS
    ))
    .bind(email.trim())
    .bind(encrypted_password)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Admin user {} not found", id)))?;

    log::info!("updated admin user {}", id);
    Ok(admin)
}

/// Admins that still have tasks assigned cannot be deleted.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let (task_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE admin_user_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if task_count > 0 {
        return Err(AppError::Conflict(format!(
            "Admin user {} still has {} task(s) assigned and cannot be deleted",
            id, task_count
        )));
    }

    let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Admin user {} not found", id)));
    }

    log::info!("deleted admin user {}", id);
    Ok(())
}

/// Rotates the sign-in tracking columns for a successful login.
pub async fn record_sign_in(
    pool: &PgPool,
    id: i32,
    ip: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE admin_users \
         SET sign_in_count = sign_in_count + 1, \
             last_sign_in_at = current_sign_in_at, current_sign_in_at = $1, \
             last_sign_in_ip = current_sign_in_ip, current_sign_in_ip = $2 \
         WHERE id = $3",
    )
    .bind(now)
    .bind(ip)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_reset_password_token(
    conn: &mut PgConnection,
    id: i32,
    token: &str,
    sent_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE admin_users SET reset_password_token = $1, reset_password_sent_at = $2 \
         WHERE id = $3",
    )
    .bind(token)
    .bind(sent_at)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_reset_password_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<AdminUser>, AppError> {
    Ok(sqlx::query_as::<_, AdminUser>(&format!(
        "SELECT {} FROM admin_users WHERE reset_password_token = $1",
        ADMIN_USER_COLUMNS
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?)
}

/// Stores a new password hash and consumes the reset token.
pub async fn reset_password(
    pool: &PgPool,
    id: i32,
    encrypted_password: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE admin_users \
         SET encrypted_password = $1, reset_password_token = NULL, \
             reset_password_sent_at = NULL, updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(encrypted_password)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
