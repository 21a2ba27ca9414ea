use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::extractors::{bearer_from_header, token_from_cookie};
use crate::auth::{
    hash_password, issue_token, verify_password, AccessToken, AuthenticatedUser, LoginRequest,
    RegisterRequest, RevocationList, ACCESS_TOKEN_COOKIE,
};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AuditLog, User, UserResponse};

fn access_cookie(token: &str, minutes: i64) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(minutes * 60))
        .finish()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// Authenticates a user and opens a session.
///
/// The lookup deliberately includes soft-deleted rows: a deactivated account
/// answers 403 while a wrong password or unknown email answers 401.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = User::find_by_email(&pool, &login_data.email)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".into()))?;

    if user.deleted {
        return Err(AppError::Forbidden("Account disabled".into()));
    }

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthenticated("Invalid credentials".into()));
    }

    let token = issue_token(config.get_ref(), &user.email, user.role.as_str())?;

    Ok(HttpResponse::Ok()
        .cookie(access_cookie(&token, config.access_token_expire_minutes))
        .json(AccessToken {
            access_token: token,
            token_type: "Bearer".to_string(),
        }))
}

/// Creates an account and opens a session for it.
///
/// A taken email yields 400 with the session cookie cleared; no user row is
/// written and no token is issued.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register_data.validate()?;

    if User::find_by_email(&pool, &register_data.email)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::BadRequest()
            .cookie(clear_cookie())
            .json(json!({ "error": "Email already registered" })));
    }

    let password_hash = hash_password(&register_data.password)?;

    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name_complete, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name_complete, email, password_hash, role, deleted, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&register_data.name_complete)
    .bind(&register_data.email)
    .bind(&password_hash)
    .bind(register_data.role)
    .fetch_one(&mut *tx)
    .await?;
    AuditLog::record(
        &mut tx,
        &format!("User '{}' was created.", user.name_complete),
        Some(user.id),
    )
    .await?;
    tx.commit().await?;

    let token = issue_token(config.get_ref(), &user.email, user.role.as_str())?;

    Ok(HttpResponse::Created()
        .cookie(access_cookie(&token, config.access_token_expire_minutes))
        .json(UserResponse::from(user)))
}

/// Returns the caller's own profile.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}

/// Ends the session. Always 200, authenticated or not.
///
/// Both token carriers are inspected independently: the cookie token is
/// revoked when present, and a header token that differs from it is revoked
/// as well, so a stale header-held token dies with the active cookie session.
#[get("/logout")]
pub async fn logout(req: HttpRequest, revocations: web::Data<RevocationList>) -> impl Responder {
    let mut token = token_from_cookie(&req);

    if let Some(header_token) = bearer_from_header(&req) {
        match &token {
            None => token = Some(header_token),
            Some(cookie_token) if *cookie_token != header_token => {
                revocations.revoke(&header_token);
            }
            _ => {}
        }
    }

    if let Some(token) = token {
        log::debug!("revoking session token on logout");
        revocations.revoke(&token);
    }

    HttpResponse::Ok()
        .cookie(clear_cookie())
        .json(json!({ "message": "Session closed" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::{test, App};

    #[::std::prelude::v1::test]
    fn test_access_cookie_attributes() {
        let cookie = access_cookie("tok", 30);
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(30 * 60)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[::std::prelude::v1::test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_cookie();
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    async fn call_logout(req: test::TestRequest) -> (u16, web::Data<RevocationList>) {
        let revocations = web::Data::new(RevocationList::new());
        let app = test::init_service(
            App::new()
                .app_data(revocations.clone())
                .service(logout),
        )
        .await;
        let resp = test::call_service(&app, req.uri("/logout").to_request()).await;
        (resp.status().as_u16(), revocations)
    }

    #[actix_rt::test]
    async fn test_logout_revokes_cookie_and_differing_header_token() {
        let req = test::TestRequest::get()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "t1"))
            .insert_header((header::AUTHORIZATION, "Bearer t2"));
        let (status, revocations) = call_logout(req).await;

        assert_eq!(status, 200);
        assert!(revocations.is_revoked("t1"));
        assert!(revocations.is_revoked("t2"));
    }

    #[actix_rt::test]
    async fn test_logout_with_identical_tokens_revokes_once() {
        let req = test::TestRequest::get()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "t1"))
            .insert_header((header::AUTHORIZATION, "Bearer t1"));
        let (status, revocations) = call_logout(req).await;

        assert_eq!(status, 200);
        assert!(revocations.is_revoked("t1"));
        assert_eq!(revocations.len(), 1);
    }

    #[actix_rt::test]
    async fn test_logout_adopts_header_token_when_cookie_absent() {
        let req = test::TestRequest::get()
            .insert_header((header::AUTHORIZATION, "Bearer t2"));
        let (status, revocations) = call_logout(req).await;

        assert_eq!(status, 200);
        assert!(revocations.is_revoked("t2"));
        assert_eq!(revocations.len(), 1);
    }

    #[actix_rt::test]
    async fn test_logout_strips_cookie_bearer_prefix() {
        let req = test::TestRequest::get()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "Bearer t1"));
        let (status, revocations) = call_logout(req).await;

        assert_eq!(status, 200);
        assert!(revocations.is_revoked("t1"));
        assert!(!revocations.is_revoked("Bearer t1"));
    }

    #[actix_rt::test]
    async fn test_logout_without_credentials_is_still_ok() {
        let (status, revocations) = call_logout(test::TestRequest::get()).await;

        assert_eq!(status, 200);
        assert!(revocations.is_empty());
    }

    #[actix_rt::test]
    async fn test_logout_clears_the_session_cookie() {
        let revocations = web::Data::new(RevocationList::new());
        let app = test::init_service(
            App::new()
                .app_data(revocations.clone())
                .service(logout),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/logout")
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "t1"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let cleared = resp
            .response()
            .cookies()
            .find(|cookie| cookie.name() == ACCESS_TOKEN_COOKIE)
            .expect("logout must reset the access_token cookie");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
    }
}
