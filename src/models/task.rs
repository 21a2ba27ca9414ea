use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    // Status is a free-form lowercase word such as "pending" or "in_progress".
    static ref STATUS_REGEX: regex::Regex = regex::Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap();
}

/// Status a freshly created task starts in.
pub const DEFAULT_STATUS: &str = "pending";

/// A task row as stored in the database. Responses go through
/// [`TaskResponse`] so the soft-delete flag never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub task_name: String,
    pub description: Option<String>,
    pub status: String,
    /// Owning user.
    pub user_id: Uuid,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Fetches a non-deleted task by id. Ownership is checked by the caller;
    /// a soft-deleted task is indistinguishable from a missing one.
    pub async fn find_active_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, task_name, description, status, user_id, deleted, created_at, updated_at \
             FROM tasks WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Input for creating a task. Status always starts at [`DEFAULT_STATUS`].
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1, max = 200))]
    pub task_name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Per-field optional patch for a task. Absent fields keep their stored
/// values.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub task_name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(regex(
        path = "STATUS_REGEX",
        message = "status must be a lowercase word like 'pending' or 'done'"
    ))]
    pub status: Option<String>,
}

/// Task shape returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub task_name: String,
    pub description: Option<String>,
    pub status: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            task_name: task.task_name,
            description: task.description,
            status: task.status,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Paginated envelope for the task search endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedTasks {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub tasks: Vec<TaskResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_task_create_validation() {
        let valid = TaskCreate {
            task_name: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = TaskCreate {
            task_name: "".to_string(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let long_name = TaskCreate {
            task_name: "a".repeat(201),
            description: None,
        };
        assert!(long_name.validate().is_err());

        let long_description = TaskCreate {
            task_name: "ok".to_string(),
            description: Some("b".repeat(2001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_task_update_status_shape() {
        for status in ["pending", "in_progress", "done", "on-hold"] {
            let patch = TaskUpdate {
                task_name: None,
                description: None,
                status: Some(status.to_string()),
            };
            assert!(patch.validate().is_ok(), "{} should be accepted", status);
        }

        for status in ["Pending", "IN PROGRESS", "42", "", "done!"] {
            let patch = TaskUpdate {
                task_name: None,
                description: None,
                status: Some(status.to_string()),
            };
            assert!(patch.validate().is_err(), "{:?} should be rejected", status);
        }
    }

    #[test]
    fn test_empty_patch_is_valid() {
        let patch = TaskUpdate {
            task_name: None,
            description: None,
            status: None,
        };
        assert!(patch.validate().is_ok());
    }
}
