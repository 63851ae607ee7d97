//! Named task scopes.
//!
//! A scope is a read-only predicate over tasks. Each one can be evaluated
//! against a loaded `Task` (`matches`) or appended to a SQL query
//! (`push_condition`); both forms agree. A slice of scopes composes with AND.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use std::fmt;
use std::str::FromStr;

use crate::auth::AdminContext;
use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    #[default]
    All,
    DueThisWeek,
    Late,
    Mine,
}

impl TaskScope {
    /// Scopes in the order their tabs appear on the task index.
    pub const TABS: [TaskScope; 4] = [
        TaskScope::All,
        TaskScope::DueThisWeek,
        TaskScope::Late,
        TaskScope::Mine,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TaskScope::All => "all",
            TaskScope::DueThisWeek => "due_this_week",
            TaskScope::Late => "late",
            TaskScope::Mine => "mine",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskScope::All => "All",
            TaskScope::DueThisWeek => "Due This Week",
            TaskScope::Late => "Late",
            TaskScope::Mine => "Mine",
        }
    }

    pub fn matches(self, task: &Task, ctx: &AdminContext) -> bool {
        match self {
            TaskScope::All => true,
            TaskScope::DueThisWeek => is_due_this_week(task.due_date, ctx.now),
            TaskScope::Late => is_late(task.due_date, ctx.now),
            TaskScope::Mine => task.admin_user_id == ctx.admin_user_id,
        }
    }

    /// Appends ` AND <condition>` to a query whose WHERE clause is already open.
    /// `column_prefix` is the tasks table alias including the dot, e.g. `"t."`.
    pub fn push_condition(
        self,
        query: &mut QueryBuilder<'_, Postgres>,
        column_prefix: &str,
        ctx: &AdminContext,
    ) {
        let now = ctx.now.naive_utc();
        match self {
            TaskScope::All => {}
            TaskScope::DueThisWeek => {
                query
                    .push(format!(" AND {}due_date > ", column_prefix))
                    .push_bind(now)
                    .push(format!(" AND {}due_date < ", column_prefix))
                    .push_bind(now + week());
            }
            TaskScope::Late => {
                query
                    .push(format!(" AND {}due_date < ", column_prefix))
                    .push_bind(now);
            }
            TaskScope::Mine => {
                query
                    .push(format!(" AND {}admin_user_id = ", column_prefix))
                    .push_bind(ctx.admin_user_id);
            }
        }
    }
}

/// True when the task satisfies every scope in `scopes`.
pub fn matches_all(scopes: &[TaskScope], task: &Task, ctx: &AdminContext) -> bool {
    scopes.iter().all(|scope| scope.matches(task, ctx))
}

pub fn push_conditions(
    scopes: &[TaskScope],
    query: &mut QueryBuilder<'_, Postgres>,
    column_prefix: &str,
    ctx: &AdminContext,
) {
    for scope in scopes {
        scope.push_condition(query, column_prefix, ctx);
    }
}

impl fmt::Display for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TaskScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskScope::TABS
            .into_iter()
            .find(|scope| scope.key() == s)
            .ok_or_else(|| format!("unknown scope `{}`", s))
    }
}

fn week() -> Duration {
    Duration::weeks(1)
}

/// A due date compares as midnight UTC at the start of that day, the way the
/// database compares a DATE column against a timestamp.
fn due_instant(due: NaiveDate) -> NaiveDateTime {
    due.and_time(NaiveTime::MIN)
}

/// now < due < now + 7 days. Both bounds are exclusive.
pub fn is_due_this_week(due: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    let now = now.naive_utc();
    due.map(due_instant)
        .map_or(false, |due| due > now && due < now + week())
}

/// due < now, exclusive.
pub fn is_late(due: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    let now = now.naive_utc();
    due.map(due_instant).map_or(false, |due| due < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx_at(now: DateTime<Utc>) -> AdminContext {
        AdminContext {
            admin_user_id: 2,
            email: "a@b.com".to_string(),
            now,
        }
    }

    fn task(admin_user_id: i32, due_date: Option<NaiveDate>) -> Task {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: 1,
            project_id: 1,
            admin_user_id,
            title: "Write roadmap".to_string(),
            is_done: false,
            due_date,
            created_at: created,
            updated_at: created,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_tomorrow_is_due_this_week_and_not_late() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let ctx = ctx_at(now);
        let t = task(2, date(2026, 10, 18));
        assert!(TaskScope::DueThisWeek.matches(&t, &ctx));
        assert!(!TaskScope::Late.matches(&t, &ctx));
        assert!(matches_all(&[TaskScope::Mine, TaskScope::DueThisWeek], &t, &ctx));
    }

    #[test]
    fn test_yesterday_is_late_and_not_due_this_week() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let ctx = ctx_at(now);
        let t = task(2, date(2026, 10, 16));
        assert!(TaskScope::Late.matches(&t, &ctx));
        assert!(!TaskScope::DueThisWeek.matches(&t, &ctx));
    }

    #[test]
    fn test_due_exactly_now_is_in_neither_scope() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        let ctx = ctx_at(now);
        let t = task(2, date(2026, 10, 17));
        assert!(!TaskScope::Late.matches(&t, &ctx));
        assert!(!TaskScope::DueThisWeek.matches(&t, &ctx));
    }

    #[test]
    fn test_due_exactly_one_week_out_is_excluded() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        assert!(!is_due_this_week(date(2026, 10, 24), now));
        assert!(is_due_this_week(date(2026, 10, 23), now));
    }

    #[test]
    fn test_today_counts_as_late_once_the_day_started() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 1).unwrap();
        assert!(is_late(date(2026, 10, 17), now));
    }

    #[test]
    fn test_tasks_without_due_date_are_in_no_time_scope() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let ctx = ctx_at(now);
        let t = task(2, None);
        assert!(!TaskScope::Late.matches(&t, &ctx));
        assert!(!TaskScope::DueThisWeek.matches(&t, &ctx));
        assert!(TaskScope::All.matches(&t, &ctx));
    }

    #[test]
    fn test_mine_compares_assignee_with_current_admin() {
        let ctx = ctx_at(Utc::now());
        assert!(TaskScope::Mine.matches(&task(2, None), &ctx));
        assert!(!TaskScope::Mine.matches(&task(3, None), &ctx));
    }

    #[test]
    fn test_scope_keys_round_trip_through_from_str() {
        for scope in TaskScope::TABS {
            assert_eq!(scope.key().parse::<TaskScope>().unwrap(), scope);
        }
        assert!("overdue".parse::<TaskScope>().is_err());
        assert_eq!(TaskScope::default(), TaskScope::All);
    }

    #[test]
    fn test_push_condition_builds_exclusive_bounds() {
        let ctx = ctx_at(Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap());
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM tasks t WHERE TRUE");
        push_conditions(
            &[TaskScope::Mine, TaskScope::DueThisWeek],
            &mut query,
            "t.",
            &ctx,
        );
        assert_eq!(
            query.sql(),
            "SELECT * FROM tasks t WHERE TRUE AND t.admin_user_id = $1 \
             AND t.due_date > $2 AND t.due_date < $3"
        );
    }

    #[test]
    fn test_all_adds_no_condition() {
        let ctx = ctx_at(Utc::now());
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM tasks WHERE TRUE");
        TaskScope::All.push_condition(&mut query, "", &ctx);
        assert_eq!(query.sql(), "SELECT * FROM tasks WHERE TRUE");
    }
}
