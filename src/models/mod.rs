pub mod admin_user;
pub mod comment;
pub mod project;
pub mod task;

pub use admin_user::{AdminUser, AdminUserChanges, AdminUserInput};
pub use comment::{Comment, CommentInput, CommentRow};
pub use project::{Project, ProjectInput};
pub use task::{NewTask, Task, TaskInput, TaskRow, TaskStatus};
