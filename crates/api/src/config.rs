use crate::auth::jwt::JwtConfig;

/// Which [`catalog_db::store::ResourceStore`] implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; contents are lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Some(StoreBackend::Postgres),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// `Cache-Control` values attached to read responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// `max-age` for single-resource responses.
    pub item_max_age_secs: u64,
    /// `max-age` for list responses.
    pub list_max_age_secs: u64,
    /// Sent verbatim on 304 responses.
    pub not_modified: String,
}

impl CachePolicy {
    pub fn item(&self) -> String {
        format!("public, max-age={}", self.item_max_age_secs)
    }

    pub fn list(&self) -> String {
        format!("public, max-age={}", self.list_max_age_secs)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            item_max_age_secs: 600,
            list_max_age_secs: 300,
            not_modified: "public, max-age=600".to_string(),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store: StoreBackend,
    /// Required when `store` is [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    pub cache: CachePolicy,
    /// Reject `PUT` without `If-Match` (428) instead of writing unconditionally.
    pub require_if_match: bool,
    pub log_format: LogFormat,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `HOST`                       | `0.0.0.0`                |
    /// | `PORT`                       | `3000`                   |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                     |
    /// | `CATALOG_STORE`              | `postgres`               |
    /// | `DATABASE_URL`               | --                       |
    /// | `ITEM_MAX_AGE_SECS`          | `600`                    |
    /// | `LIST_MAX_AGE_SECS`          | `300`                    |
    /// | `NOT_MODIFIED_CACHE_CONTROL` | `public, max-age=600`    |
    /// | `REQUIRE_IF_MATCH`           | `false`                  |
    /// | `LOG_FORMAT`                 | `text`                   |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store = StoreBackend::parse(
            &std::env::var("CATALOG_STORE").unwrap_or_else(|_| "postgres".into()),
        )
        .expect("CATALOG_STORE must be 'postgres' or 'memory'");

        let database_url = std::env::var("DATABASE_URL").ok();
        if store == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when CATALOG_STORE=postgres"
            );
        }

        let defaults = CachePolicy::default();
        let cache = CachePolicy {
            item_max_age_secs: std::env::var("ITEM_MAX_AGE_SECS")
                .map(|v| v.parse().expect("ITEM_MAX_AGE_SECS must be a valid u64"))
                .unwrap_or(defaults.item_max_age_secs),
            list_max_age_secs: std::env::var("LIST_MAX_AGE_SECS")
                .map(|v| v.parse().expect("LIST_MAX_AGE_SECS must be a valid u64"))
                .unwrap_or(defaults.list_max_age_secs),
            not_modified: std::env::var("NOT_MODIFIED_CACHE_CONTROL")
                .unwrap_or(defaults.not_modified),
        };

        let require_if_match = std::env::var("REQUIRE_IF_MATCH")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store,
            database_url,
            cache,
            require_if_match,
            log_format,
            jwt,
        }
    }
}
