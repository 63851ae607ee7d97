use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// The title, or `Project #<id>` when the title is blank.
    pub fn display_name(&self) -> String {
        display_name(self.id, &self.title)
    }
}

pub fn display_name(id: i32, title: &str) -> String {
    if title.trim().is_empty() {
        format!("Project #{}", id)
    } else {
        title.to_string()
    }
}

/// Project form parameters. Projects carry no validations of their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub title: String,
}

impl ProjectInput {
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let now = Utc::now();
        let mut project = Project {
            id: 7,
            title: "Website".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(project.display_name(), "Website");

        project.title = "  ".to_string();
        assert_eq!(project.display_name(), "Project #7");
    }

    #[test]
    fn test_title_is_trimmed() {
        let input = ProjectInput {
            title: "  Launch ".to_string(),
        };
        assert_eq!(input.normalized_title(), "Launch");
    }
}
