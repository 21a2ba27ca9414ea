use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, Transaction};
use uuid::Uuid;

/// Immutable audit record, appended for every mutating user/task operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: String,
    /// Acting or affected user. Null once the user row is physically removed.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Appends one entry inside the caller's transaction so the log commits
    /// or rolls back together with the mutation it describes.
    pub async fn record(
        tx: &mut Transaction<'_, Postgres>,
        action: &str,
        user_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO logs (id, action, user_id) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(action)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

/// Paginated envelope for the audit trail endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedLogs {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub logs: Vec<AuditLog>,
}
