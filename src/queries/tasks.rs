use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::ValidationErrors;

use crate::{
    auth::AdminContext,
    error::AppError,
    models::{admin_user::message, NewTask, Task, TaskRow},
    queries::{comments, scopes, PageParams, TaskFilter, TaskScope},
};

const TASK_COLUMNS: &str =
    "id, project_id, admin_user_id, title, is_done, due_date, created_at, updated_at";

/// Tasks joined with their project title and assignee email. Ends with an open
/// WHERE clause so scopes and filters can append ` AND ...` conditions.
const TASK_ROW_SELECT: &str = "SELECT t.id, t.project_id, t.admin_user_id, t.title, t.is_done, \
     t.due_date, t.created_at, t.updated_at, p.title AS project_title, u.email AS assignee_email \
     FROM tasks t \
     JOIN projects p ON p.id = t.project_id \
     JOIN admin_users u ON u.id = t.admin_user_id \
     WHERE TRUE";

fn scoped_query<'a>(
    base: &str,
    scopes: &[TaskScope],
    filter: &TaskFilter,
    ctx: &AdminContext,
) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new(base);
    scopes::push_conditions(scopes, &mut query, "t.", ctx);
    filter.push_conditions(&mut query, "t.");
    query
}

/// One page of the task index, newest first.
pub async fn list(
    pool: &PgPool,
    scopes: &[TaskScope],
    filter: &TaskFilter,
    ctx: &AdminContext,
    page: &PageParams,
) -> Result<Vec<TaskRow>, AppError> {
    let mut query = scoped_query(TASK_ROW_SELECT, scopes, filter, ctx);
    query.push(" ORDER BY t.id DESC");
    page.push_limit(&mut query);
    Ok(query.build_query_as::<TaskRow>().fetch_all(pool).await?)
}

/// Every task in the scopes, soonest due first. Used by dashboard panels.
pub async fn list_by_due_date(
    pool: &PgPool,
    scopes: &[TaskScope],
    ctx: &AdminContext,
) -> Result<Vec<TaskRow>, AppError> {
    let mut query = scoped_query(TASK_ROW_SELECT, scopes, &TaskFilter::default(), ctx);
    query.push(" ORDER BY t.due_date ASC NULLS LAST, t.id ASC");
    Ok(query.build_query_as::<TaskRow>().fetch_all(pool).await?)
}

pub async fn count(
    pool: &PgPool,
    scopes: &[TaskScope],
    filter: &TaskFilter,
    ctx: &AdminContext,
) -> Result<i64, AppError> {
    let mut query = scoped_query("SELECT COUNT(*) FROM tasks t WHERE TRUE", scopes, filter, ctx);
    Ok(query.build_query_scalar::<i64>().fetch_one(pool).await?)
}

pub async fn for_project(pool: &PgPool, project_id: i32) -> Result<Vec<TaskRow>, AppError> {
    let mut query = QueryBuilder::<Postgres>::new(TASK_ROW_SELECT);
    query
        .push(" AND t.project_id = ")
        .push_bind(project_id)
        .push(" ORDER BY t.id ASC");
    Ok(query.build_query_as::<TaskRow>().fetch_all(pool).await?)
}

/// The current admin's tasks on `project_id`, leaving out `task_id` itself.
pub async fn others_for_admin_on_project(
    pool: &PgPool,
    ctx: &AdminContext,
    project_id: i32,
    task_id: i32,
) -> Result<Vec<TaskRow>, AppError> {
    let filter = TaskFilter {
        project_id: Some(project_id),
        ..TaskFilter::default()
    };
    let mut query = scoped_query(TASK_ROW_SELECT, &[TaskScope::Mine], &filter, ctx);
    query
        .push(" AND t.id <> ")
        .push_bind(task_id)
        .push(" ORDER BY t.id ASC");
    Ok(query.build_query_as::<TaskRow>().fetch_all(pool).await?)
}

pub async fn find(pool: &PgPool, id: i32) -> Result<TaskRow, AppError> {
    let mut query = QueryBuilder::<Postgres>::new(TASK_ROW_SELECT);
    query.push(" AND t.id = ").push_bind(id);
    query
        .build_query_as::<TaskRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
}

/// Field errors for a write that named a project or assignee which does not
/// exist, keyed by the violated foreign key of the `tasks` table.
pub fn missing_reference(constraint: Option<&str>) -> Option<ValidationErrors> {
    let field = match constraint? {
        "tasks_project_id_fkey" => "project_id",
        "tasks_admin_user_id_fkey" => "admin_user_id",
        _ => return None,
    };
    let mut errors = ValidationErrors::new();
    errors.add(field, message("exists", "must exist"));
    Some(errors)
}

/// Splits a failed task write into form errors and real failures.
fn write_error(error: sqlx::Error) -> Result<ValidationErrors, AppError> {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_foreign_key_violation() {
            if let Some(errors) = missing_reference(db_err.constraint()) {
                return Ok(errors);
            }
        }
    }
    Err(error.into())
}

/// Inserts a task. The inner `Err` carries field errors for a missing project
/// or assignee.
pub async fn insert(
    pool: &PgPool,
    task: &NewTask,
) -> Result<Result<Task, ValidationErrors>, AppError> {
    let created = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (project_id, admin_user_id, title, is_done, due_date) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.project_id)
    .bind(task.admin_user_id)
    .bind(&task.title)
    .bind(task.is_done)
    .bind(task.due_date)
    .fetch_one(pool)
    .await;

    match created {
        Ok(created) => {
            log::info!("created task {} in project {}", created.id, created.project_id);
            Ok(Ok(created))
        }
        Err(error) => write_error(error).map(Err),
    }
}

/// Same contract as `insert`; an unknown task id is `NotFound`.
pub async fn update(
    pool: &PgPool,
    id: i32,
    task: &NewTask,
) -> Result<Result<Task, ValidationErrors>, AppError> {
    let updated = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET project_id = $1, admin_user_id = $2, title = $3, is_done = $4, due_date = $5, \
             updated_at = NOW() \
         WHERE id = $6 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task.project_id)
    .bind(task.admin_user_id)
    .bind(&task.title)
    .bind(task.is_done)
    .bind(task.due_date)
    .bind(id)
    .fetch_optional(pool)
    .await;

    match updated {
        Ok(Some(updated)) => {
            log::info!("updated task {}", id);
            Ok(Ok(updated))
        }
        Ok(None) => Err(AppError::NotFound(format!("Task {} not found", id))),
        Err(error) => write_error(error).map(Err),
    }
}

/// Deletes the task together with its comments.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    comments::delete_for_resource(&mut *tx, comments::TASK_RESOURCE, id).await?;
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Task {} not found", id)));
    }

    tx.commit().await?;
    log::info!("deleted task {}", id);
    Ok(())
}
