use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use crate::forms::{blank_as_none, blank_as_none_bool};

/// The two display states of a task. Driven only by `is_done`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Done,
    Pending,
}

impl TaskStatus {
    pub fn from_done(is_done: bool) -> Self {
        if is_done {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Done => "Done",
            TaskStatus::Pending => "Pending",
        }
    }

    /// Status tag class: `ok` for done tasks, `error` for pending ones.
    pub fn css_class(self) -> &'static str {
        match self {
            TaskStatus::Done => "ok",
            TaskStatus::Pending => "error",
        }
    }
}

/// Represents a task as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub project_id: i32,
    pub admin_user_id: i32,
    pub title: String,
    pub is_done: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_done(self.is_done)
    }
}

/// A task joined with the project title and assignee email, which every task
/// table in the admin displays.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TaskRow {
    #[sqlx(flatten)]
    pub task: Task,
    pub project_title: String,
    pub assignee_email: String,
}

/// Task form parameters as submitted by the browser.
///
/// Every field is optional at this level so a missing value surfaces as a
/// validation message on the form rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "can't be blank"),
        length(max = 255, message = "is too long (maximum is 255 characters)")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "can't be blank"))]
    pub project_id: Option<i32>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "can't be blank"))]
    pub admin_user_id: Option<i32>,

    #[serde(default, deserialize_with = "blank_as_none_bool")]
    #[validate(required(message = "is not included in the list"))]
    pub is_done: Option<bool>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<NaiveDate>,
}

/// A task that passed validation and can be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub project_id: i32,
    pub admin_user_id: i32,
    pub title: String,
    pub is_done: bool,
    pub due_date: Option<NaiveDate>,
}

impl TaskInput {
    /// Validates the input and converts it into a `NewTask`.
    pub fn validated(&self) -> Result<NewTask, ValidationErrors> {
        self.validate()?;
        match (&self.title, self.project_id, self.admin_user_id, self.is_done) {
            (Some(title), Some(project_id), Some(admin_user_id), Some(is_done)) => Ok(NewTask {
                project_id,
                admin_user_id,
                title: title.clone(),
                is_done,
                due_date: self.due_date,
            }),
            // validate() already rejected every missing field
            _ => Err(ValidationErrors::new()),
        }
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            project_id: Some(task.project_id),
            admin_user_id: Some(task.admin_user_id),
            is_done: Some(task.is_done),
            due_date: task.due_date,
        }
    }
}
