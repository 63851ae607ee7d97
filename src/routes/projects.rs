use actix_web::{delete as delete_route, get, http::StatusCode, post, web, HttpResponse};
use sqlx::PgPool;

use crate::{
    admin::{
        form::render_form,
        html::{self, link_to, panel, post_button},
        index::{render_index, IndexPage},
        resources::{
            project_detail_rows, project_filters, project_form_fields, project_index_columns,
            project_path, task_panel_columns, PROJECTS_PATH,
        },
        table::{attributes_table, table_for},
    },
    auth::AdminContext,
    error::AppError,
    models::{Project, ProjectInput},
    queries::{projects, tasks, PageParams, ProjectFilter},
};

#[get("")]
pub async fn index(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    filter: web::Query<ProjectFilter>,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let rows = projects::list(&pool, &filter, &page).await?;
    let total = projects::count(&pool, &filter).await?;

    let page_config = IndexPage {
        title: "Projects",
        path: PROJECTS_PATH,
        new_label: "New Project",
        columns: project_index_columns(),
        row_path: |project: &Project| project_path(project.id),
        filters: project_filters(),
        filter_values: serde_json::to_value(&*filter)?,
        scopes: None,
    };
    let (main, sidebar) = render_index(&page_config, &rows, &page, total);
    Ok(html::ok(html::layout(
        "Projects",
        Some(&ctx),
        &html::main_with_sidebar(&main, &sidebar),
    )))
}

fn form_page(ctx: &AdminContext, title: &str, action: &str, input: &ProjectInput) -> HttpResponse {
    let submit = if action == PROJECTS_PATH {
        "Create Project"
    } else {
        "Update Project"
    };
    let form = render_form(
        action,
        "Project Details",
        &project_form_fields(input),
        None,
        submit,
        PROJECTS_PATH,
    );
    html::ok(html::layout(
        title,
        Some(ctx),
        &html::main_with_sidebar(&form, ""),
    ))
}

#[get("/new")]
pub async fn new_form(ctx: AdminContext) -> HttpResponse {
    form_page(&ctx, "New Project", PROJECTS_PATH, &ProjectInput::default())
}

#[post("")]
pub async fn create(
    pool: web::Data<PgPool>,
    form: web::Form<ProjectInput>,
) -> Result<HttpResponse, AppError> {
    let project = projects::insert(&pool, &form.normalized_title()).await?;
    Ok(html::redirect(&project_path(project.id)))
}

/// Titled by the project's display name, with its tasks in a "Tasks" panel.
#[get("/{id}")]
pub async fn show(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let project = projects::find(&pool, path.into_inner()).await?;
    let project_tasks = tasks::for_project(&pool, project.id).await?;

    let path = project_path(project.id);
    let main = format!(
        "<div class=\"action_items\">{} {}</div>{}{}",
        link_to("Edit Project", &format!("{}/edit", path)),
        post_button(
            "Delete Project",
            &format!("{}/delete", path),
            Some("Are you sure you want to delete this?")
        ),
        panel("Project Details", &attributes_table(&project, &project_detail_rows())),
        panel("Tasks", &table_for(&project_tasks, &task_panel_columns())),
    );

    Ok(html::ok(html::layout(
        &project.display_name(),
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
    let project = projects::find(&pool, path.into_inner()).await?;
    let input = ProjectInput {
        title: project.title.clone(),
    };
    Ok(form_page(&ctx, "Edit Project", &project_path(project.id), &input))
}

#[post("/{id}")]
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    form: web::Form<ProjectInput>,
) -> Result<HttpResponse, AppError> {
    let project = projects::update(&pool, path.into_inner(), &form.normalized_title()).await?;
    Ok(html::redirect(&project_path(project.id)))
}

/// Fails with 409 while the project still has tasks.
#[post("/{id}/delete")]
pub async fn destroy(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    projects::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(PROJECTS_PATH))
}

#[delete_route("/{id}")]
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    projects::delete(&pool, path.into_inner()).await?;
    Ok(html::redirect(PROJECTS_PATH))
}
