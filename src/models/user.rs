use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Account role.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    /// Full access to the user roster and the audit trail.
    #[sqlx(rename = "Admin")]
    Admin,
    /// Regular account; sees only its own tasks.
    #[sqlx(rename = "Public")]
    Public,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Public => "Public",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user row as stored in the database. Not serialized to clients;
/// responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name_complete: String,
    /// Unique; doubles as the token subject.
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    /// Soft-delete flag. A deactivated user cannot authenticate.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Looks up a non-deactivated user by email. This is the lookup the
    /// identity resolver uses, so soft-deleted accounts cannot authenticate.
    pub async fn find_active_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
             FROM users WHERE email = $1 AND deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Looks up a user by email regardless of the soft-delete flag. The login
    /// route needs the deactivated row to answer 403 instead of 401.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Looks up a non-deactivated user by id.
    pub async fn find_active_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
             FROM users WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// User shape returned by the API: no credential, no soft-delete flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name_complete: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name_complete: user.name_complete,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Per-field optional patch for an admin user edit. Absent fields keep
/// their stored values.
#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name_complete: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    /// Re-hashed before storage when present.
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

/// Paginated envelope for the roster endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedUsers {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub users: Vec<UserResponse>,
}
