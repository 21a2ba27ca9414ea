//! Startup provisioning.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::{AuditLog, UserRole};

pub const ADMIN_EMAIL: &str = "admin@task.com";
const ADMIN_NAME: &str = "Administrator";
const ADMIN_PASSWORD: &str = "admin";

/// Ensures the bootstrap administrator account exists so a fresh deployment
/// can be managed at all. Idempotent across restarts.
pub async fn ensure_admin(pool: &PgPool) -> Result<(), AppError> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(ADMIN_EMAIL)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(ADMIN_PASSWORD)?;
    let id = Uuid::new_v4();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO users (id, name_complete, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(ADMIN_NAME)
    .bind(ADMIN_EMAIL)
    .bind(&password_hash)
    .bind(UserRole::Admin)
    .execute(&mut *tx)
    .await?;
    AuditLog::record(
        &mut tx,
        &format!("User '{}' was created.", ADMIN_NAME),
        Some(id),
    )
    .await?;
    tx.commit().await?;

    log::info!("bootstrapped administrator account {}", ADMIN_EMAIL);
    Ok(())
}
