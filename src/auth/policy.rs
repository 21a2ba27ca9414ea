//! Pure allow/deny decisions applied after identity resolution.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{User, UserRole};

/// Allows only administrators.
pub fn require_admin(user: &User) -> Result<(), AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Permission denied".into()));
    }
    Ok(())
}

/// Allows the resource owner or an administrator.
///
/// Item-level routes that gate on ownership must report a failed check as
/// `NotFound`, not `Forbidden`, so callers map the error at the call site.
pub fn require_owner_or_admin(user: &User, owner_id: Uuid) -> Result<(), AppError> {
    if user.role == UserRole::Admin || user.id == owner_id {
        return Ok(());
    }
    Err(AppError::Forbidden("Permission denied".into()))
}
