pub mod extractors;
pub mod password;
pub mod policy;
pub mod revocation;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserRole;

// Re-export necessary items
pub use extractors::{AdminUser, AuthenticatedUser};
pub use password::{hash_password, verify_password};
pub use revocation::RevocationList;
pub use token::{issue_token, issue_token_with_ttl, verify_token, Claims};

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address, also the token subject.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, max = 200))]
    pub name_complete: String,
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
    pub role: UserRole,
}

/// Response body after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());

        // Login must not reject short passwords up front; the bootstrap
        // administrator password is only five characters.
        let short_password_login = LoginRequest {
            email: "admin@task.com".to_string(),
            password: "admin".to_string(),
        };
        assert!(short_password_login.validate().is_ok());
    }

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            name_complete: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: UserRole::Public,
        };
        assert!(valid_register.validate().is_ok());

        let empty_name_register = RegisterRequest {
            name_complete: "".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            role: UserRole::Public,
        };
        assert!(empty_name_register.validate().is_err());

        let short_password_register = RegisterRequest {
            name_complete: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "123".to_string(),
            role: UserRole::Public,
        };
        assert!(short_password_register.validate().is_err());

        let bad_email_register = RegisterRequest {
            name_complete: "Test User".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            role: UserRole::Admin,
        };
        assert!(bad_email_register.validate().is_err());
    }
}
