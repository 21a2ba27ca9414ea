//! Admin-only user roster management and the audit trail.
//!
//! Every handler here takes the [`AdminUser`] extractor, so a `Public`
//! caller is rejected with 403 before any query runs.

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{hash_password, AdminUser};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    AuditLog, PageQuery, PaginatedLogs, PaginatedUsers, User, UserResponse, UserUpdate,
};
use crate::routes::paginate;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

/// Lists active users, newest first.
#[get("")]
pub async fn list_users(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let limit = query.limit(config.get_ref());
    let offset = query.offset();

    let users = sqlx::query_as::<_, User>(
        "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
         FROM users WHERE deleted = FALSE \
         ORDER BY created_at DESC OFFSET $1 LIMIT $2",
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(pool.get_ref())
    .await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// Relevance-scored text search over active users.
#[get("/filter")]
pub async fn filter_users(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let limit = query.limit(config.get_ref());
    let offset = query.offset();

    let users = sqlx::query_as::<_, User>(
        "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
         FROM users WHERE deleted = FALSE \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let mut users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    if let Some(term) = query.search.as_deref() {
        let term = term.trim().to_lowercase();
        if !term.is_empty() {
            users = rank_users(users, &term);
        }
    }

    let total = users.len() as i64;
    let users = paginate(users, offset, limit);

    Ok(HttpResponse::Ok().json(PaginatedUsers {
        total,
        limit,
        offset,
        users,
    }))
}

/// Paginated audit trail, newest first. `total` is the grand total of
/// entries, not the page size.
#[get("/logs")]
pub async fn list_logs(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let limit = query.limit(config.get_ref());
    let offset = query.offset();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
        .fetch_one(pool.get_ref())
        .await?;

    let logs = sqlx::query_as::<_, AuditLog>(
        "SELECT id, action, user_id, created_at FROM logs \
         ORDER BY created_at DESC OFFSET $1 LIMIT $2",
    )
    .bind(offset)
    .bind(limit)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(PaginatedLogs {
        total,
        limit,
        offset,
        logs,
    }))
}

/// Fetches one active user.
#[get("/{user_id}")]
pub async fn get_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let user = User::find_active_by_id(&pool, user_id.into_inner())
        .await?
        .ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Applies a per-field patch to a user. A supplied password is re-hashed
/// before storage.
#[put("/{user_id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    user_data: web::Json<UserUpdate>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let user = User::find_active_by_id(&pool, user_id.into_inner())
        .await?
        .ok_or_else(user_not_found)?;

    let password_hash = match &user_data.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let mut tx = pool.begin().await?;
    let updated = sqlx::query_as::<_, User>(
        "UPDATE users SET \
           name_complete = COALESCE($2, name_complete), \
           email = COALESCE($3, email), \
           role = COALESCE($4, role), \
           password_hash = COALESCE($5, password_hash), \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, name_complete, email, password_hash, role, deleted, created_at, updated_at",
    )
    .bind(user.id)
    .bind(&user_data.name_complete)
    .bind(&user_data.email)
    .bind(user_data.role)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await?;
    AuditLog::record(
        &mut tx,
        &format!("User '{}' was updated.", updated.name_complete),
        Some(updated.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// Soft-deletes a user. The account can no longer log in or authenticate
/// with previously issued tokens.
#[delete("/{user_id}")]
pub async fn deactivate_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let user = User::find_active_by_id(&pool, user_id.into_inner())
        .await?
        .ok_or_else(user_not_found)?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE users SET deleted = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;
    AuditLog::record(
        &mut tx,
        &format!("User '{}' was deactivated.", user.name_complete),
        Some(user.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({ "deactivated": "ok" })))
}

/// Reverses a soft delete. Only a currently deactivated user qualifies;
/// anything else is 404.
#[post("/activate/{user_id}")]
pub async fn activate_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name_complete, email, password_hash, role, deleted, created_at, updated_at \
         FROM users WHERE id = $1 AND deleted = TRUE",
    )
    .bind(user_id.into_inner())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(user_not_found)?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE users SET deleted = FALSE, updated_at = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;
    AuditLog::record(
        &mut tx,
        &format!("User '{}' was reactivated.", user.name_complete),
        Some(user.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({ "activated": "ok" })))
}

fn score_user(user: &UserResponse, term: &str) -> i32 {
    let mut score = 0;
    let name = user.name_complete.to_lowercase();
    let email = user.email.to_lowercase();
    let role = user.role.as_str().to_lowercase();

    if name.starts_with(term) {
        score += 100;
    } else if name.contains(term) {
        score += 30;
    }

    if email.starts_with(term) || role.starts_with(term) {
        score += 50;
    } else if email.contains(term) || role.contains(term) {
        score += 20;
    }

    score
}

/// Keeps users with a positive score, ordered by score descending then name
/// ascending.
fn rank_users(users: Vec<UserResponse>, term: &str) -> Vec<UserResponse> {
    let mut scored: Vec<(i32, UserResponse)> = users
        .into_iter()
        .filter_map(|user| {
            let score = score_user(&user, term);
            (score > 0).then_some((score, user))
        })
        .collect();
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.name_complete.cmp(&b.1.name_complete))
    });
    scored.into_iter().map(|(_, user)| user).collect()
}
