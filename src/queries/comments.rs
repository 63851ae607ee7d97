use sqlx::{PgConnection, PgPool};

use crate::{
    error::AppError,
    models::{comment::ADMIN_NAMESPACE, Comment, CommentRow},
    queries::PageParams,
};

/// Resource type stored on comments left on tasks.
pub const TASK_RESOURCE: &str = "Task";

const COMMENT_ROW_SELECT: &str = "SELECT c.id, c.namespace, c.resource_type, c.resource_id, \
     c.author_id, c.body, c.created_at, c.updated_at, u.email AS author_email \
     FROM admin_comments c \
     JOIN admin_users u ON u.id = c.author_id";

pub async fn for_resource(
    pool: &PgPool,
    resource_type: &str,
    resource_id: i32,
) -> Result<Vec<CommentRow>, AppError> {
    let comments = sqlx::query_as::<_, CommentRow>(&format!(
        "{} WHERE c.namespace = $1 AND c.resource_type = $2 AND c.resource_id = $3 \
         ORDER BY c.created_at ASC, c.id ASC",
        COMMENT_ROW_SELECT
    ))
    .bind(ADMIN_NAMESPACE)
    .bind(resource_type)
    .bind(resource_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// One page of every admin comment, newest first.
pub async fn list(pool: &PgPool, page: &PageParams) -> Result<Vec<CommentRow>, AppError> {
    let comments = sqlx::query_as::<_, CommentRow>(&format!(
        "{} WHERE c.namespace = $1 ORDER BY c.id DESC LIMIT $2 OFFSET $3",
        COMMENT_ROW_SELECT
    ))
    .bind(ADMIN_NAMESPACE)
    .bind(crate::queries::PER_PAGE)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

pub async fn count(pool: &PgPool) -> Result<i64, AppError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM admin_comments WHERE namespace = $1")
            .bind(ADMIN_NAMESPACE)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn insert(
    pool: &PgPool,
    resource_type: &str,
    resource_id: i32,
    author_id: i32,
    body: &str,
) -> Result<Comment, AppError> {
    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO admin_comments (namespace, resource_type, resource_id, author_id, body) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, namespace, resource_type, resource_id, author_id, body, \
                   created_at, updated_at",
    )
    .bind(ADMIN_NAMESPACE)
    .bind(resource_type)
    .bind(resource_id)
    .bind(author_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    log::info!(
        "admin {} commented on {} {}",
        author_id,
        resource_type,
        resource_id
    );
    Ok(comment)
}

pub async fn delete_for_resource(
    conn: &mut PgConnection,
    resource_type: &str,
    resource_id: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "DELETE FROM admin_comments WHERE resource_type = $1 AND resource_id = $2",
    )
    .bind(resource_type)
    .bind(resource_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
