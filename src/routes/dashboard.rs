use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::{
    admin::{
        html::{self, blank_slate, panel, SITE_TITLE},
        resources::task_panel_columns,
        table::table_for,
    },
    auth::AdminContext,
    error::AppError,
    queries::{tasks, TaskScope},
};

pub const DASHBOARD_PATH: &str = "/admin/dashboard";

#[get("")]
pub async fn root() -> HttpResponse {
    html::redirect(DASHBOARD_PATH)
}

/// The signed-in admin's week: tasks due in the next seven days and tasks
/// already past their due date.
#[get("/dashboard")]
pub async fn dashboard(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
) -> Result<HttpResponse, AppError> {
    let this_week =
        tasks::list_by_due_date(&pool, &[TaskScope::Mine, TaskScope::DueThisWeek], &ctx).await?;
    let late = tasks::list_by_due_date(&pool, &[TaskScope::Mine, TaskScope::Late], &ctx).await?;

    let columns = task_panel_columns();
    let content = format!(
        "<div class=\"blank_slate_container\" id=\"dashboard_default_message\">{}</div>\
         <div class=\"columns\" style=\"display:flex;gap:20px\">\
         <div class=\"column\" style=\"flex:1\">{}</div>\
         <div class=\"column\" style=\"flex:1\">{}</div></div>",
        blank_slate(&format!(
            "Welcome to {}. This is the default dashboard page.",
            SITE_TITLE
        )),
        panel("Your tasks for this week", &table_for(&this_week, &columns)),
        panel("Tasks that are late", &table_for(&late, &columns)),
    );

    Ok(html::ok(html::layout(
        "Dashboard",
        Some(&ctx),
        &html::main_with_sidebar(&content, ""),
    )))
}
