use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::{
    admin::{
        html::{self, blank_slate},
        index::pagination,
        resources::{comment_index_columns, COMMENTS_PATH},
        table::table_for,
    },
    auth::AdminContext,
    error::AppError,
    queries::{comments, PageParams},
};

/// Every admin comment, newest first. Comments are added from the pages of
/// the records they belong to, so this page only lists them.
#[get("")]
pub async fn index(
    pool: web::Data<PgPool>,
    ctx: AdminContext,
    page: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let rows = comments::list(&pool, &page).await?;
    let total = comments::count(&pool).await?;

    let table = if rows.is_empty() {
        blank_slate("There are no comments yet.")
    } else {
        table_for(&rows, &comment_index_columns())
    };
    let main = format!("{}{}", table, pagination(COMMENTS_PATH, &page, total, &[]));
    Ok(html::ok(html::layout(
        "Comments",
        Some(&ctx),
        &html::main_with_sidebar(&main, ""),
    )))
}
