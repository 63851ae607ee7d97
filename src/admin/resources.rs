//! Per-entity page configuration: which columns, rows, filters and form
//! fields each admin page shows. Handlers in `routes` pass these tables to
//! the generic renderers.

use crate::admin::form::{id_options, FormField, InputKind};
use crate::admin::html::{
    escape, format_date_long, format_datetime_long, link_to, status_tag,
};
use crate::admin::index::{FilterField, FilterKind};
use crate::admin::table::{AttributeRow, Column};
use crate::models::{
    project, AdminUser, AdminUserInput, CommentRow, Project, ProjectInput, TaskInput, TaskRow,
};
use crate::queries::comments::TASK_RESOURCE;

pub const ADMIN_USERS_PATH: &str = "/admin/admin_users";
pub const PROJECTS_PATH: &str = "/admin/projects";
pub const TASKS_PATH: &str = "/admin/tasks";
pub const COMMENTS_PATH: &str = "/admin/comments";

pub fn task_path(id: i32) -> String {
    format!("{}/{}", TASKS_PATH, id)
}

pub fn project_path(id: i32) -> String {
    format!("{}/{}", PROJECTS_PATH, id)
}

pub fn admin_user_path(id: i32) -> String {
    format!("{}/{}", ADMIN_USERS_PATH, id)
}

fn task_title_link(row: &TaskRow) -> String {
    link_to(&row.task.title, &task_path(row.task.id))
}

fn task_project_link(row: &TaskRow) -> String {
    link_to(
        &project::display_name(row.task.project_id, &row.project_title),
        &project_path(row.task.project_id),
    )
}

fn task_assignee_link(row: &TaskRow) -> String {
    link_to(&row.assignee_email, &admin_user_path(row.task.admin_user_id))
}

// Tasks

/// Columns of the dashboard panels and the project "Tasks" panel.
pub fn task_panel_columns() -> Vec<Column<TaskRow>> {
    vec![
        Column::new("Status", |row: &TaskRow| status_tag(row.task.status())),
        Column::new("Title", task_title_link),
        Column::new("Assigned To", task_assignee_link),
        Column::new("Due Date", |row: &TaskRow| format_date_long(row.task.due_date)),
    ]
}

pub fn task_index_columns() -> Vec<Column<TaskRow>> {
    vec![
        Column::new("Status", |row: &TaskRow| status_tag(row.task.status())),
        Column::new("Title", task_title_link),
        Column::new("Project", task_project_link),
        Column::new("Assigned To", task_assignee_link),
        Column::new("Due Date", |row: &TaskRow| format_date_long(row.task.due_date)),
    ]
}

/// Rows of the "Task Details" panel.
pub fn task_detail_rows() -> Vec<AttributeRow<TaskRow>> {
    vec![
        AttributeRow::new("Status", |row: &TaskRow| status_tag(row.task.status())),
        AttributeRow::new("Title", |row: &TaskRow| escape(&row.task.title)),
        AttributeRow::new("Project", task_project_link),
        AttributeRow::new("Assigned To", task_assignee_link),
        AttributeRow::new("Due Date", |row: &TaskRow| format_date_long(row.task.due_date)),
    ]
}

/// Columns of the "Other Tasks For This User" sidebar.
pub fn other_tasks_columns() -> Vec<Column<TaskRow>> {
    vec![
        Column::new("Status", |row: &TaskRow| status_tag(row.task.status())),
        Column::new("Title", task_title_link),
    ]
}

pub fn task_filters(projects: &[(i32, String)], admins: &[(i32, String)]) -> Vec<FilterField> {
    vec![
        FilterField::new("project_id", "Project", FilterKind::Select(id_options(projects))),
        FilterField::new("admin_user_id", "Assigned To", FilterKind::Select(id_options(admins))),
        FilterField::new("title", "Title", FilterKind::Contains),
        FilterField::new("is_done", "Is Done", FilterKind::Boolean),
        FilterField::new("due_date", "Due Date", FilterKind::DateRange),
    ]
}

pub fn task_form_fields(
    input: &TaskInput,
    projects: &[(i32, String)],
    admins: &[(i32, String)],
) -> Vec<FormField> {
    let id_value = |id: Option<i32>| id.map(|id| id.to_string()).unwrap_or_default();
    vec![
        FormField::new(
            "title",
            "Title",
            InputKind::Text,
            input.title.clone().unwrap_or_default(),
        ),
        FormField::new(
            "project_id",
            "Project",
            InputKind::Select(id_options(projects)),
            id_value(input.project_id),
        ),
        FormField::new(
            "admin_user_id",
            "Assigned To",
            InputKind::Select(id_options(admins)),
            id_value(input.admin_user_id),
        ),
        FormField::new(
            "is_done",
            "Status",
            InputKind::Select(vec![
                ("false".to_string(), "Pending".to_string()),
                ("true".to_string(), "Done".to_string()),
            ]),
            input.is_done.map(|done| done.to_string()).unwrap_or_default(),
        ),
        FormField::new(
            "due_date",
            "Due Date",
            InputKind::Date,
            input
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
    ]
}

// Projects

pub fn project_index_columns() -> Vec<Column<Project>> {
    vec![Column::new("Title", |project: &Project| {
        link_to(&project.display_name(), &project_path(project.id))
    })]
}

pub fn project_detail_rows() -> Vec<AttributeRow<Project>> {
    vec![
        AttributeRow::new("Id", |project: &Project| project.id.to_string()),
        AttributeRow::new("Title", |project: &Project| escape(&project.title)),
        AttributeRow::new("Created At", |project: &Project| {
            format_datetime_long(Some(project.created_at))
        }),
        AttributeRow::new("Updated At", |project: &Project| {
            format_datetime_long(Some(project.updated_at))
        }),
    ]
}

pub fn project_filters() -> Vec<FilterField> {
    vec![FilterField::new("title", "Title", FilterKind::Contains)]
}

pub fn project_form_fields(input: &ProjectInput) -> Vec<FormField> {
    vec![FormField::new("title", "Title", InputKind::Text, input.title.clone())]
}

// Admin users

pub fn admin_user_index_columns() -> Vec<Column<AdminUser>> {
    vec![
        Column::new("", |admin: &AdminUser| {
            format!(
                "<input type=\"checkbox\" class=\"collection_selection\" \
                 name=\"collection_selection[]\" value=\"{}\">",
                admin.id
            )
        }),
        Column::new("Id", |admin: &AdminUser| {
            link_to(&admin.id.to_string(), &admin_user_path(admin.id))
        }),
        Column::new("Email", |admin: &AdminUser| escape(&admin.email)),
        Column::new("Current Sign In At", |admin: &AdminUser| {
            format_datetime_long(admin.current_sign_in_at)
        }),
        Column::new("Sign In Count", |admin: &AdminUser| admin.sign_in_count.to_string()),
        Column::new("Created At", |admin: &AdminUser| format_datetime_long(Some(admin.created_at))),
    ]
}

/// Every attribute except the password hash and reset token.
pub fn admin_user_detail_rows() -> Vec<AttributeRow<AdminUser>> {
    vec![
        AttributeRow::new("Id", |admin: &AdminUser| admin.id.to_string()),
        AttributeRow::new("Email", |admin: &AdminUser| escape(&admin.email)),
        AttributeRow::new("Reset Password Sent At", |admin: &AdminUser| {
            format_datetime_long(admin.reset_password_sent_at)
        }),
        AttributeRow::new("Sign In Count", |admin: &AdminUser| admin.sign_in_count.to_string()),
        AttributeRow::new("Current Sign In At", |admin: &AdminUser| {
            format_datetime_long(admin.current_sign_in_at)
        }),
        AttributeRow::new("Last Sign In At", |admin: &AdminUser| {
            format_datetime_long(admin.last_sign_in_at)
        }),
        AttributeRow::new("Current Sign In Ip", |admin: &AdminUser| {
            escape(admin.current_sign_in_ip.as_deref().unwrap_or(""))
        }),
        AttributeRow::new("Last Sign In Ip", |admin: &AdminUser| {
            escape(admin.last_sign_in_ip.as_deref().unwrap_or(""))
        }),
        AttributeRow::new("Created At", |admin: &AdminUser| {
            format_datetime_long(Some(admin.created_at))
        }),
        AttributeRow::new("Updated At", |admin: &AdminUser| {
            format_datetime_long(Some(admin.updated_at))
        }),
    ]
}

pub fn admin_user_filters() -> Vec<FilterField> {
    vec![
        FilterField::new("email", "Email", FilterKind::Contains),
        FilterField::new("current_sign_in_at", "Current Sign In At", FilterKind::DateRange),
        FilterField::new("sign_in_count", "Sign In Count", FilterKind::Number),
        FilterField::new("created_at", "Created At", FilterKind::DateRange),
    ]
}

/// The email field, plus password fields when editing an existing admin.
pub fn admin_user_form_fields(input: &AdminUserInput, persisted: bool) -> Vec<FormField> {
    let mut fields = vec![FormField::new(
        "email",
        "Email",
        InputKind::Email,
        input.email.clone().unwrap_or_default(),
    )];
    if persisted {
        fields.push(FormField::new("password", "Password", InputKind::Password, String::new()));
        fields.push(FormField::new(
            "password_confirmation",
            "Password Confirmation",
            InputKind::Password,
            String::new(),
        ));
    }
    fields
}

// Comments

fn comment_resource_link(row: &CommentRow) -> String {
    let comment = &row.comment;
    let label = format!("{} #{}", comment.resource_type, comment.resource_id);
    if comment.resource_type == TASK_RESOURCE {
        link_to(&label, &task_path(comment.resource_id))
    } else {
        escape(&label)
    }
}

pub fn comment_index_columns() -> Vec<Column<CommentRow>> {
    vec![
        Column::new("Resource", comment_resource_link),
        Column::new("Author", |row: &CommentRow| {
            link_to(&row.author_email, &admin_user_path(row.comment.author_id))
        }),
        Column::new("Body", |row: &CommentRow| escape(&row.comment.body)),
        Column::new("Created At", |row: &CommentRow| {
            format_datetime_long(Some(row.comment.created_at))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::table::{attributes_table, table_for};
    use crate::models::{Comment, Task};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task_row(is_done: bool, due_date: Option<NaiveDate>) -> TaskRow {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        TaskRow {
            task: Task {
                id: 5,
                project_id: 2,
                admin_user_id: 3,
                title: "Write <docs>".to_string(),
                is_done,
                due_date,
                created_at: at,
                updated_at: at,
            },
            project_title: String::new(),
            assignee_email: "ann@example.com".to_string(),
        }
    }

    #[test]
    fn test_dashboard_columns() {
        let rows = [task_row(false, NaiveDate::from_ymd_opt(2026, 10, 5))];
        let html = table_for(&rows, &task_panel_columns());
        assert!(html.contains(
            "<th>Status</th><th>Title</th><th>Assigned To</th><th>Due Date</th>"
        ));
        assert!(html.contains("<span class=\"status_tag error\">Pending</span>"));
        assert!(html.contains("<a href=\"/admin/tasks/5\">Write &lt;docs&gt;</a>"));
        assert!(html.contains("<a href=\"/admin/admin_users/3\">ann@example.com</a>"));
        assert!(html.contains("<td>October 05, 2026</td>"));
    }

    #[test]
    fn test_task_details_use_project_fallback_name() {
        let html = attributes_table(&task_row(true, None), &task_detail_rows());
        assert!(html.contains(
            "<tr><th>Status</th><td><span class=\"status_tag ok\">Done</span></td></tr>"
        ));
        assert!(html.contains("<a href=\"/admin/projects/2\">Project #2</a>"));
        assert!(html.contains("<tr><th>Due Date</th><td>-</td></tr>"));
    }

    #[test]
    fn test_task_form_prefills_input() {
        let input = TaskInput {
            title: Some("Ship".to_string()),
            project_id: Some(2),
            admin_user_id: None,
            is_done: Some(false),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 20),
        };
        let fields = task_form_fields(&input, &[(2, "Web".to_string())], &[]);
        let values: Vec<&str> = fields.iter().map(|field| field.value.as_str()).collect();
        assert_eq!(values, vec!["Ship", "2", "", "false", "2026-10-20"]);
    }

    #[test]
    fn test_admin_user_form_shows_password_only_on_edit() {
        let input = AdminUserInput::default();
        assert_eq!(admin_user_form_fields(&input, false).len(), 1);
        let names: Vec<&str> = admin_user_form_fields(&input, true)
            .iter()
            .map(|field| field.name)
            .collect();
        assert_eq!(names, vec!["email", "password", "password_confirmation"]);
    }

    #[test]
    fn test_comment_resource_links_to_task() {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
        let row = CommentRow {
            comment: Comment {
                id: 1,
                namespace: "admin".to_string(),
                resource_type: TASK_RESOURCE.to_string(),
                resource_id: 5,
                author_id: 3,
                body: "Looks good".to_string(),
                created_at: at,
                updated_at: at,
            },
            author_email: "ann@example.com".to_string(),
        };
        let html = table_for(&[row], &comment_index_columns());
        assert!(html.contains("<a href=\"/admin/tasks/5\">Task #5</a>"));
        assert!(html.contains("<td>Looks good</td>"));
    }
}
