pub mod audit;
pub mod task;
pub mod user;

pub use audit::{AuditLog, PaginatedLogs};
pub use task::{PaginatedTasks, Task, TaskCreate, TaskResponse, TaskUpdate};
pub use user::{PaginatedUsers, User, UserResponse, UserRole, UserUpdate};

use serde::Deserialize;

use crate::config::Config;

/// Common pagination / search query parameters.
///
/// `limit` falls back to the configured default and is clamped to
/// `[1, max_limit]`; `offset` is clamped to be non-negative.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn limit(&self, config: &Config) -> i64 {
        self.limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: "secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            default_limit: 100,
            max_limit: 500,
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
        }
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery {
            limit: None,
            offset: None,
            search: None,
        };
        let config = test_config();
        assert_eq!(query.limit(&config), 100);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_clamping() {
        let config = test_config();

        let too_large = PageQuery {
            limit: Some(10_000),
            offset: Some(-5),
            search: None,
        };
        assert_eq!(too_large.limit(&config), 500);
        assert_eq!(too_large.offset(), 0);

        let too_small = PageQuery {
            limit: Some(0),
            offset: Some(25),
            search: None,
        };
        assert_eq!(too_small.limit(&config), 1);
        assert_eq!(too_small.offset(), 25);
    }
}
