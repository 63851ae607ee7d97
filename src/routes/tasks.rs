use actix_web::{delete as delete_route, get, http::StatusCode, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::{Validate, ValidationErrors};

use crate::{
    admin::{
        form::{render_form, FormField, InputKind},
        html::{self, escape, format_datetime_long, link_to, panel, post_button, sidebar_section},
        index::{render_index, IndexPage, ScopeTab, ScopeTabs},
        resources::{
            other_tasks_columns, task_detail_rows, task_filters, task_form_fields,
            task_index_columns, task_path, TASKS_PATH,
        },
        table::{attributes_table, table_for},
    },
    auth::AdminContext,
    error::AppError,
    models::{CommentInput, CommentRow, TaskInput, TaskRow},
    queries::{
        admin_users,
        comments::{self, TASK_RESOURCE},
        projects, tasks, PageParams, TaskFilter, TaskScope,
    },
};

/// The `?scope=` parameter of the task index. Unknown scopes are a 400.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScopeParams {
    #[serde(default)]
    pub scope: TaskScope,
}

/// Task index with one tab per scope. Each tab shows how many tasks it holds
/// under the current filters.
#[get("")]
pub async fn index(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    scope: web::Query<ScopeParams>,
    filter: web::Query<TaskFilter>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let current = [scope.scope];
    let rows = tasks::list(&pool, &current, &filter, &ctx, &page).await?;

    let mut tabs = Vec::with_capacity(TaskScope::TABS.len());
    let mut total = 0;
    for tab in TaskScope::TABS {
        let count = tasks::count(&pool, &[tab], &filter, &ctx).await?;
        if tab == scope.scope {
            total = count;
        }
        tabs.push(ScopeTab {
            key: tab.key(),
            label: tab.label(),
            count,
        });
    }

    let project_options = projects::options(&pool).await?;
    let admin_options = admin_users::options(&pool).await?;
    let page_config = IndexPage {
        title: "Tasks",
        path: TASKS_PATH,
        new_label: "New Task",
        columns: task_index_columns(),
        row_path: |row: &TaskRow| task_path(row.task.id),
        filters: task_filters(&project_options, &admin_options),
        filter_values: serde_json::to_value(&*filter)?,
        scopes: Some(ScopeTabs {
            tabs,
            current: scope.scope.key(),
        }),
    };

    let (main, sidebar) = render_index(&page_config, &rows, &page, total);
    Ok(html::ok(html::layout(
        "Tasks",
        Some(&ctx),
        &html::main_with_sidebar(&main, &sidebar),
    )))
}

async fn form_page(
    pool: &PgPool,
    ctx: &AdminContext,
    title: &str,
    action: &str,
    input: &TaskInput,
    errors: Option<&ValidationErrors>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let project_options = projects::options(pool).await?;
    let admin_options = admin_users::options(pool).await?;
    let form = render_form(
        action,
        "Task Details",
        &task_form_fields(input, &project_options, &admin_options),
        errors,
        if action == TASKS_PATH { "Create Task" } else { "Update Task" },
        TASKS_PATH,
    );
    Ok(html::page(
        status,
        html::layout(title, Some(ctx), &html::main_with_sidebar(&form, "")),
    ))
}

#[get("/new")]
pub async fn new_form(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
) -> Result<HttpResponse, AppError> {
    let input = TaskInput {
        admin_user_id: Some(ctx.admin_user_id),
        is_done: Some(false),
        ..TaskInput::default()
    };
    form_page(&pool, &ctx, "New Task", TASKS_PATH, &input, None, StatusCode::OK).await
}

#[post("")]
pub async fn create(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    form: web::Form<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let errors = match form.validated() {
        Ok(new_task) => match tasks::insert(&pool, &new_task).await? {
            Ok(task) => return Ok(html::redirect(&task_path(task.id))),
            Err(errors) => errors,
        },
        Err(errors) => errors,
    };
    form_page(
        &pool,
        &ctx,
        "New Task",
        TASKS_PATH,
        &form,
        Some(&errors),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
}

fn comments_panel(
    task_id: i32,
    comments: &[CommentRow],
    errors: Option<&ValidationErrors>,
) -> String {
    let list = if comments.is_empty() {
        "<p class=\"empty\">No comments yet.</p>".to_string()
    } else {
        comments
            .iter()
            .map(|row| {
                format!(
                    "<div class=\"active_admin_comment\"><div class=\"active_admin_comment_meta\">\
                     <strong>{}</strong> <span>{}</span></div>\
                     <div class=\"active_admin_comment_body\">{}</div></div>",
                    escape(&row.author_email),
                    format_datetime_long(Some(row.comment.created_at)),
                    escape(&row.comment.body)
                )
            })
            .collect()
    };
    let fields = [FormField::new("body", "Comment", InputKind::Text, String::new())];
    let form = render_form(
        &format!("{}/comments", task_path(task_id)),
        "Add Comment",
        &fields,
        errors,
        "Add Comment",
        &task_path(task_id),
    );
    panel(&format!("Comments ({})", comments.len()), &format!("{}{}", list, form))
}

/// The show page: "Task Details", the comments, and a sidebar with the current
/// admin's other tasks on the same project.
async fn show_page(
    pool: &PgPool,
    ctx: &AdminContext,
    row: &TaskRow,
    comment_errors: Option<&ValidationErrors>,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let task = &row.task;
    let others = tasks::others_for_admin_on_project(pool, ctx, task.project_id, task.id).await?;
    let task_comments = comments::for_resource(pool, TASK_RESOURCE, task.id).await?;

    let path = task_path(task.id);
    let main = format!(
        "<div class=\"action_items\">{} {}</div>{}{}",
        link_to("Edit Task", &format!("{}/edit", path)),
        post_button(
            "Delete Task",
            &format!("{}/delete", path),
            Some("Are you sure you want to delete this?")
        ),
        panel("Task Details", &attributes_table(row, &task_detail_rows())),
        comments_panel(task.id, &task_comments, comment_errors)
    );
    let sidebar = sidebar_section(
        "Other Tasks For This User",
        &table_for(&others, &other_tasks_columns()),
    );

    Ok(html::page(
        status,
        html::layout(&task.title, Some(ctx), &html::main_with_sidebar(&main, &sidebar)),
    ))
}

#[get("/{id}")]
pub async fn show(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let row = tasks::find(&pool, path.into_inner()).await?;
    show_page(&pool, &ctx, &row, None, StatusCode::OK).await
}

#[get("/{id}/edit")]
pub async fn edit_form(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let row = tasks::find(&pool, path.into_inner()).await?;
    let input = TaskInput::from(&row.task);
    form_page(
        &pool,
        &ctx,
        "Edit Task",
        &task_path(row.task.id),
        &input,
        None,
        StatusCode::OK,
    )
    .await
}

#[post("/{id}")]
pub async fn update(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
    form: web::Form<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let errors = match form.validated() {
        Ok(changes) => match tasks::update(&pool, id, &changes).await? {
            Ok(task) => return Ok(html::redirect(&task_path(task.id))),
            Err(errors) => errors,
        },
        Err(errors) => {
            // 404 for an unknown task even when the form is invalid.
            tasks::find(&pool, id).await?;
            errors
        }
    };
    form_page(
        &pool,
        &ctx,
        "Edit Task",
        &task_path(id),
        &form,
        Some(&errors),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await
}

#[post("/{id}/comments")]
pub async fn create_comment(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
    form: web::Form<CommentInput>,
) -> Result<HttpResponse, AppError> {
    let row = tasks::find(&pool, path.into_inner()).await?;
    if let Err(errors) = form.validate() {
        return show_page(
            &pool,
            &ctx,
            &row,
            Some(&errors),
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .await;
    }

    let body = form.body.as_deref().unwrap_or_default();
    comments::insert(&pool, TASK_RESOURCE, row.task.id, ctx.admin_user_id, body).await?;
    Ok(html::redirect(&task_path(row.task.id)))
}

#[post("/{id}/delete")]
pub async fn destroy(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    tasks::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(TASKS_PATH))
}

#[delete_route("/{id}")]
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    tasks::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(TASKS_PATH))
}
