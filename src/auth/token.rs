use crate::config::Config;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// Role the subject held when the token was issued.
    pub role: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues a signed access token for `subject` with the configured lifetime.
///
/// The token encodes the subject email, the role and an absolute expiry of
/// now plus `access_token_expire_minutes`. No side effects.
pub fn issue_token(config: &Config, subject: &str, role: &str) -> Result<String, AppError> {
    issue_token_with_ttl(config, subject, role, config.access_token_expire_minutes)
}

/// Same as [`issue_token`] but with an explicit lifetime in minutes.
pub fn issue_token_with_ttl(
    config: &Config,
    subject: &str,
    role: &str,
    ttl_minutes: i64,
) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::minutes(ttl_minutes))
        .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))
}

/// Verifies a token's signature and expiry and decodes its claims.
///
/// Every failure mode — malformed encoding, bad signature, missing subject,
/// expiry in the past — returns the same `Unauthenticated` error so the
/// caller cannot distinguish them.
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(config.jwt_algorithm),
    )
    .map(|data| data.claims)?;

    if claims.sub.is_empty() {
        return Err(AppError::Unauthenticated("Not authenticated".into()));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config(secret: &str) -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: secret.to_string(),
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            default_limit: 100,
            max_limit: 500,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let config = test_config("roundtrip-secret");
        let token = issue_token(&config, "user@example.com", "Public").unwrap();
        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.role, "Public");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config("expiry-secret");
        // Well past the decoder's default leeway.
        let token = issue_token_with_ttl(&config, "user@example.com", "Public", -10).unwrap();
        match verify_token(&config, &token) {
            Err(AppError::Unauthenticated(_)) => {}
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config("signing-secret");
        let other = test_config("a-completely-different-secret");
        let token = issue_token(&config, "user@example.com", "Admin").unwrap();
        match verify_token(&other, &token) {
            Err(AppError::Unauthenticated(_)) => {}
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = test_config("garbage-secret");
        for garbage in ["", "not-a-jwt", "a.b", "a.b.c.d"] {
            match verify_token(&config, garbage) {
                Err(AppError::Unauthenticated(_)) => {}
                other => panic!("expected Unauthenticated for {:?}, got {:?}", garbage, other),
            }
        }
    }

    #[test]
    fn test_failure_messages_are_indistinguishable() {
        let config = test_config("uniform-secret");
        let expired = issue_token_with_ttl(&config, "user@example.com", "Public", -10).unwrap();
        let forged = issue_token(&test_config("other"), "user@example.com", "Public").unwrap();

        let msg = |t: &str| match verify_token(&config, t) {
            Err(AppError::Unauthenticated(m)) => m,
            other => panic!("expected Unauthenticated, got {:?}", other),
        };

        assert_eq!(msg(&expired), msg(&forged));
        assert_eq!(msg(&forged), msg("garbage"));
    }
}
