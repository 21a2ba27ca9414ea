//! Per-request identity resolution.
//!
//! [`AuthenticatedUser`] is the extractor every protected endpoint takes: it
//! pulls a candidate token out of the request, checks revocation before
//! signature validity, verifies the token and loads the matching active user.
//! [`AdminUser`] layers the admin role check on top for the roster routes.

use actix_web::dev::Payload;
use actix_web::{http::header, web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::{policy, revocation::RevocationList, token::verify_token, ACCESS_TOKEN_COOKIE};
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;

/// Token taken from a well-formed `Authorization: Bearer <token>` header.
pub(crate) fn bearer_from_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Token taken from the `access_token` cookie, with an optional `Bearer `
/// prefix stripped.
pub(crate) fn token_from_cookie(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|cookie| {
            let value = cookie.value();
            value.strip_prefix("Bearer ").unwrap_or(value).trim().to_string()
        })
        .filter(|token| !token.is_empty())
}

/// The header wins when both carriers are present; a malformed header falls
/// back to the cookie.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    bearer_from_header(req).or_else(|| token_from_cookie(req))
}

fn not_authenticated() -> AppError {
    AppError::Unauthenticated("Not authenticated".into())
}

/// Resolves the request's credentials to an active user.
///
/// Read-only: the single suspension point is the user lookup.
pub async fn resolve_user(req: &HttpRequest) -> Result<User, AppError> {
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::Internal("database pool not configured".into()))?;
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Internal("configuration not available".into()))?;
    let revocations = req
        .app_data::<web::Data<RevocationList>>()
        .ok_or_else(|| AppError::Internal("revocation list not configured".into()))?;

    let token = token_from_request(req).ok_or_else(not_authenticated)?;

    // Revocation is checked before signature verification so a revoked but
    // still cryptographically valid token is always rejected.
    if revocations.is_revoked(&token) {
        log::debug!("rejecting revoked token");
        return Err(not_authenticated());
    }

    let claims = verify_token(config, &token)?;

    let user = User::find_active_by_email(pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            log::debug!("token subject {} unknown or deactivated", claims.sub);
            not_authenticated()
        })?;

    Ok(user)
}

/// The authenticated caller, available to any protected handler.
#[derive(Debug)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = resolve_user(&req).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}

/// The authenticated caller, additionally required to hold the `Admin` role.
#[derive(Debug)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = resolve_user(&req).await?;
            policy::require_admin(&user)?;
            Ok(AdminUser(user))
        })
    }
}
