use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{policy, AuthenticatedUser};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    task::DEFAULT_STATUS, AuditLog, PageQuery, PaginatedTasks, Task, TaskCreate, TaskResponse,
    TaskUpdate, User,
};
use crate::routes::paginate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Fetches an active task and applies the ownership gate.
///
/// A missing row, a soft-deleted row and an ownership mismatch are all
/// reported as the same `NotFound` so existence never leaks through the
/// error code.
async fn find_owned_task(pool: &PgPool, id: Uuid, user: &User) -> Result<Task, AppError> {
    let task = Task::find_active_by_id(pool, id)
        .await?
        .ok_or_else(task_not_found)?;
    policy::require_owner_or_admin(user, task.user_id).map_err(|_| task_not_found())?;
    Ok(task)
}

/// Lists the caller's active tasks, newest first.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let limit = query.limit(config.get_ref());
    let offset = query.offset();

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, task_name, description, status, user_id, deleted, created_at, updated_at \
         FROM tasks WHERE user_id = $1 AND deleted = FALSE \
         ORDER BY created_at DESC OFFSET $2 LIMIT $3",
    )
    .bind(user.0.id)
    .bind(offset)
    .bind(limit)
    .fetch_all(pool.get_ref())
    .await?;

    let tasks: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(tasks))
}

/// Relevance-scored text search over the caller's active tasks.
///
/// The whole active set is scored in memory and the page is cut afterwards,
/// so `total` counts matches, not rows in the page.
#[get("/filter")]
pub async fn filter_tasks(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let limit = query.limit(config.get_ref());
    let offset = query.offset();

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, task_name, description, status, user_id, deleted, created_at, updated_at \
         FROM tasks WHERE user_id = $1 AND deleted = FALSE \
         ORDER BY created_at DESC",
    )
    .bind(user.0.id)
    .fetch_all(pool.get_ref())
    .await?;

    let mut tasks: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();

    if let Some(term) = query.search.as_deref() {
        let term = term.trim().to_lowercase();
        if !term.is_empty() {
            tasks = rank_tasks(tasks, &term);
        }
    }

    let total = tasks.len() as i64;
    let tasks = paginate(tasks, offset, limit);

    Ok(HttpResponse::Ok().json(PaginatedTasks {
        total,
        limit,
        offset,
        tasks,
    }))
}

/// Creates a task owned by the caller. Status starts at `pending`.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskCreate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut tx = pool.begin().await?;
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, task_name, description, status, user_id) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, task_name, description, status, user_id, deleted, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&task_data.task_name)
    .bind(&task_data.description)
    .bind(DEFAULT_STATUS)
    .bind(user.0.id)
    .fetch_one(&mut *tx)
    .await?;
    AuditLog::record(
        &mut tx,
        &format!("Task '{}' was created.", task.task_name),
        Some(user.0.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// Fetches one task; owner or admin only, 404 otherwise.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = find_owned_task(pool.get_ref(), task_id.into_inner(), &user.0).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Applies a per-field patch to a task; owner or admin only.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = find_owned_task(pool.get_ref(), task_id.into_inner(), &user.0).await?;

    let mut tx = pool.begin().await?;
    let updated = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET \
           task_name = COALESCE($2, task_name), \
           description = COALESCE($3, description), \
           status = COALESCE($4, status), \
           updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, task_name, description, status, user_id, deleted, created_at, updated_at",
    )
    .bind(task.id)
    .bind(&task_data.task_name)
    .bind(&task_data.description)
    .bind(&task_data.status)
    .fetch_one(&mut *tx)
    .await?;
    AuditLog::record(
        &mut tx,
        &format!("Task '{}' was updated.", updated.task_name),
        Some(user.0.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(updated)))
}

/// Soft-deletes a task; owner or admin only. The row persists but leaves
/// every listing and read path.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = find_owned_task(pool.get_ref(), task_id.into_inner(), &user.0).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE tasks SET deleted = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(task.id)
        .execute(&mut *tx)
        .await?;
    AuditLog::record(
        &mut tx,
        &format!("Task '{}' was deactivated.", task.task_name),
        Some(user.0.id),
    )
    .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": "ok" })))
}

fn score_task(task: &TaskResponse, term: &str) -> i32 {
    let mut score = 0;
    let name = task.task_name.to_lowercase();
    let description = task.description.as_deref().unwrap_or("").to_lowercase();
    let status = task.status.to_lowercase();

    if name.starts_with(term) {
        score += 100;
    } else if name.contains(term) {
        score += 30;
    }

    if !description.is_empty() && description.contains(term) {
        score += 50;
    }

    if status.contains(term) {
        score += 20;
    }

    score
}

/// Keeps tasks with a positive score, ordered by score descending then name
/// ascending.
fn rank_tasks(tasks: Vec<TaskResponse>, term: &str) -> Vec<TaskResponse> {
    let mut scored: Vec<(i32, TaskResponse)> = tasks
        .into_iter()
        .filter_map(|task| {
            let score = score_task(&task, term);
            (score > 0).then_some((score, task))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.task_name.cmp(&b.1.task_name)));
    scored.into_iter().map(|(_, task)| task).collect()
}
