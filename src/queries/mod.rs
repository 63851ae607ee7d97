//! Database access for the admin.
//!
//! Each entity module holds the SQL for its table. Listing queries accept the
//! scopes and filters defined in `scopes` and `filters` and compose them with
//! `sqlx::QueryBuilder`.

pub mod admin_users;
pub mod comments;
pub mod filters;
pub mod projects;
pub mod scopes;
pub mod tasks;

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::forms::blank_as_none;

pub use filters::{AdminUserFilter, ProjectFilter, TaskFilter};
pub use scopes::TaskScope;

/// Index pages show this many records per page.
pub const PER_PAGE: i64 = 30;

/// The `?page=` parameter of index pages (1-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
}

impl PageParams {
    pub fn number(&self) -> i64 {
        i64::from(self.page.unwrap_or(1).max(1))
    }

    pub fn offset(&self) -> i64 {
        (self.number() - 1) * PER_PAGE
    }

    pub fn total_pages(total: i64) -> i64 {
        ((total + PER_PAGE - 1) / PER_PAGE).max(1)
    }

    pub(crate) fn push_limit(&self, query: &mut QueryBuilder<'_, Postgres>) {
        query
            .push(" LIMIT ")
            .push_bind(PER_PAGE)
            .push(" OFFSET ")
            .push_bind(self.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_numbers_start_at_one() {
        assert_eq!(PageParams::default().number(), 1);
        assert_eq!(PageParams { page: Some(0) }.number(), 1);
        assert_eq!(PageParams { page: Some(3) }.offset(), 60);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PageParams::total_pages(0), 1);
        assert_eq!(PageParams::total_pages(30), 1);
        assert_eq!(PageParams::total_pages(31), 2);
    }
}
