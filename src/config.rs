use jsonwebtoken::Algorithm;
use std::env;

/// Runtime configuration, loaded once at startup from the environment
/// (optionally via a `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    /// Lifetime of issued access tokens, in minutes.
    pub access_token_expire_minutes: i64,
    pub default_limit: i64,
    pub max_limit: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env::var("DB_HOST").expect("DATABASE_URL or DB_HOST must be set");
            let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
            let user = env::var("DB_USER").expect("DB_USER must be set");
            let password = env::var("DB_PASSWORD").expect("DB_PASSWORD must be set");
            let database = env::var("DB_DATABASE").expect("DB_DATABASE must be set");
            format!(
                "postgres://{}:{}@{}:{}/{}",
                user, password, host, port, database
            )
        });

        Self {
            database_url,
            jwt_secret: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set"),
            jwt_algorithm: env::var("ALGORITHM")
                .unwrap_or_else(|_| "HS256".to_string())
                .parse()
                .expect("ALGORITHM must be a valid JWT algorithm"),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number"),
            default_limit: env::var("DEFAULT_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("DEFAULT_LIMIT must be a number"),
            max_limit: env::var("MAX_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .expect("MAX_LIMIT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
