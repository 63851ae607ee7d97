use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::Project,
    queries::{PageParams, ProjectFilter},
};

const PROJECT_COLUMNS: &str = "id, title, created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    filter: &ProjectFilter,
    page: &PageParams,
) -> Result<Vec<Project>, AppError> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM projects WHERE TRUE",
        PROJECT_COLUMNS
    ));
    filter.push_conditions(&mut query);
    query.push(" ORDER BY id DESC");
    page.push_limit(&mut query);
    Ok(query.build_query_as::<Project>().fetch_all(pool).await?)
}

pub async fn count(pool: &PgPool, filter: &ProjectFilter) -> Result<i64, AppError> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects WHERE TRUE");
    filter.push_conditions(&mut query);
    Ok(query.build_query_scalar::<i64>().fetch_one(pool).await?)
}

/// `(id, display name)` pairs for select inputs, ordered by title.
pub async fn options(pool: &PgPool) -> Result<Vec<(i32, String)>, AppError> {
    let rows: Vec<(i32, String)> =
        sqlx::query_as("SELECT id, title FROM projects ORDER BY title, id")
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .map(|(id, title)| (id, crate::models::project::display_name(id, &title)))
        .collect())
}

pub async fn find(pool: &PgPool, id: i32) -> Result<Project, AppError> {
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {} FROM projects WHERE id = $1",
        PROJECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
}

pub async fn insert(pool: &PgPool, title: &str) -> Result<Project, AppError> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (title) VALUES ($1) RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(title)
    .fetch_one(pool)
    .await?;

    log::info!("created project {}", project.id);
    Ok(project)
}

pub async fn update(pool: &PgPool, id: i32, title: &str) -> Result<Project, AppError> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "UPDATE projects SET title = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(title)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

    log::info!("updated project {}", id);
    Ok(project)
}

/// Projects that still have tasks cannot be deleted.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let (task_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if task_count > 0 {
        return Err(AppError::Conflict(format!(
            "Project {} still has {} task(s) and cannot be deleted",
            id, task_count
        )));
    }

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Project {} not found", id)));
    }

    log::info!("deleted project {}", id);
    Ok(())
}
