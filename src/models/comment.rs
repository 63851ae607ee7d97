use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::forms::blank_as_none;

/// Comments always live in the admin namespace.
pub const ADMIN_NAMESPACE: &str = "admin";

/// A note left by an admin on a record's show page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub namespace: String,
    pub resource_type: String,
    pub resource_id: i32,
    pub author_id: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment joined with its author's email.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CommentRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "can't be blank"))]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comment_body_is_required() {
        let blank: CommentInput = serde_json::from_value(json!({ "body": "  " })).unwrap();
        assert!(blank.validate().is_err());

        let present: CommentInput =
            serde_json::from_value(json!({ "body": "Blocked on review" })).unwrap();
        assert!(present.validate().is_ok());
    }
}
