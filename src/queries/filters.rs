//! Attribute filters shown in the index sidebars.
//!
//! Every filter field is optional; the ones that are set combine with AND.
//! Filters append ` AND ...` conditions to a query whose WHERE clause is
//! already open, the same way task scopes do.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::forms::{blank_as_none, blank_as_none_bool};

lazy_static! {
    // LIKE wildcards and the escape character itself.
    static ref LIKE_SPECIAL: Regex = Regex::new(r"[%_\\]").unwrap();
}

/// Builds a case-insensitive "contains" pattern in which user input matches literally.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", LIKE_SPECIAL.replace_all(term, r"\$0"))
}

fn push_contains(query: &mut QueryBuilder<'_, Postgres>, column: &str, term: &Option<String>) {
    if let Some(term) = term {
        query
            .push(format!(" AND {} ILIKE ", column))
            .push_bind(contains_pattern(term));
    }
}

/// `from` and `to` are inclusive days.
fn push_date_range(
    query: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    if let Some(from) = from {
        query.push(format!(" AND {} >= ", column)).push_bind(from);
    }
    if let Some(to) = to {
        match to.succ_opt() {
            Some(next_day) => {
                query.push(format!(" AND {} < ", column)).push_bind(next_day);
            }
            None => {
                query.push(format!(" AND {} <= ", column)).push_bind(to);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub project_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub admin_user_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_bool")]
    pub is_done: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date_to: Option<NaiveDate>,
}

impl TaskFilter {
    /// `column_prefix` is the tasks table alias including the dot, e.g. `"t."`.
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>, column_prefix: &str) {
        if let Some(project_id) = self.project_id {
            query
                .push(format!(" AND {}project_id = ", column_prefix))
                .push_bind(project_id);
        }
        if let Some(admin_user_id) = self.admin_user_id {
            query
                .push(format!(" AND {}admin_user_id = ", column_prefix))
                .push_bind(admin_user_id);
        }
        push_contains(query, &format!("{}title", column_prefix), &self.title);
        if let Some(is_done) = self.is_done {
            query
                .push(format!(" AND {}is_done = ", column_prefix))
                .push_bind(is_done);
        }
        push_date_range(
            query,
            &format!("{}due_date", column_prefix),
            self.due_date_from,
            self.due_date_to,
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
}

impl ProjectFilter {
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        push_contains(query, "title", &self.title);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminUserFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub current_sign_in_at_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub current_sign_in_at_to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sign_in_count: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub created_at_to: Option<NaiveDate>,
}

impl AdminUserFilter {
    pub fn push_conditions(&self, query: &mut QueryBuilder<'_, Postgres>) {
        push_contains(query, "email", &self.email);
        push_date_range(
            query,
            "current_sign_in_at",
            self.current_sign_in_at_from,
            self.current_sign_in_at_to,
        );
        if let Some(count) = self.sign_in_count {
            query.push(" AND sign_in_count = ").push_bind(count);
        }
        push_date_range(
            query,
            "created_at",
            self.created_at_from,
            self.created_at_to,
        );
    }
}
