use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

/// Physical representation of the repeated string columns of `act_inspection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListEncoding {
    /// `TEXT[]` columns.
    NativeArray,
    /// JSON arrays stored in text columns.
    JsonText,
}

impl ListEncoding {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "native" | "array" | "native_array" => Some(ListEncoding::NativeArray),
            "json" | "json_text" | "text" => Some(ListEncoding::JsonText),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub list_encoding: ListEncoding,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub session_cookie_name: String,
    pub session_max_age_hours: i64,
    pub session_cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub api_key: String,
    pub secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SecurityConfig {
    pub fn session_max_age_secs(&self) -> i64 {
        self.session_max_age_hours * 60 * 60
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = non_empty_var("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = non_empty_var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = non_empty_var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = non_empty_var("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = non_empty_var("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = non_empty_var("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = non_empty_var("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = non_empty_var("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = non_empty_var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = non_empty_var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = non_empty_var("DATABASE_LIST_ENCODING") {
            self.database.list_encoding = ListEncoding::parse(&v).unwrap_or(self.database.list_encoding);
        }
        if let Some(v) = non_empty_var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Some(v) = non_empty_var("API_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Some(v) = non_empty_var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Some(v) = non_empty_var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = non_empty_var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = non_empty_var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = non_empty_var("SESSION_COOKIE_NAME") {
            self.security.session_cookie_name = v;
        }
        if let Some(v) = non_empty_var("SESSION_MAX_AGE_HOURS") {
            self.security.session_max_age_hours = v.parse().unwrap_or(self.security.session_max_age_hours);
        }
        if let Some(v) = non_empty_var("SESSION_COOKIE_SECURE") {
            self.security.session_cookie_secure = v.parse().unwrap_or(self.security.session_cookie_secure);
        }

        // Lookup overrides
        if let Some(v) = non_empty_var("DADATA_API_KEY") {
            self.lookup.api_key = v;
        }
        if let Some(v) = non_empty_var("DADATA_SECRET") {
            self.lookup.secret = v;
        }
        if let Some(v) = non_empty_var("DADATA_BASE_URL") {
            self.lookup.base_url = v;
        }
        if let Some(v) = non_empty_var("DADATA_TIMEOUT_SECS") {
            self.lookup.timeout_secs = v.parse().unwrap_or(self.lookup.timeout_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "postgres".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                list_encoding: ListEncoding::NativeArray,
                run_migrations: true,
            },
            api: ApiConfig {
                default_page_size: 10,
                max_page_size: 500,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                session_cookie_name: "session_id".to_string(),
                session_max_age_hours: 8,
                session_cookie_secure: false,
            },
            lookup: LookupConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                host: "postgres".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "postgres".to_string(),
                max_connections: 20,
                connection_timeout: 10,
                list_encoding: ListEncoding::NativeArray,
                run_migrations: true,
            },
            api: ApiConfig {
                default_page_size: 10,
                max_page_size: 500,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: vec![],
                session_cookie_name: "session_id".to_string(),
                session_max_age_hours: 8,
                session_cookie_secure: false,
            },
            lookup: LookupConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                host: "postgres".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "postgres".to_string(),
                max_connections: 50,
                connection_timeout: 5,
                list_encoding: ListEncoding::NativeArray,
                run_migrations: false,
            },
            api: ApiConfig {
                default_page_size: 10,
                max_page_size: 500,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: vec![],
                session_cookie_name: "session_id".to_string(),
                session_max_age_hours: 8,
                session_cookie_secure: true,
            },
            lookup: LookupConfig::default(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret: String::new(),
            base_url: "https://suggestions.dadata.ru/suggestions/api/4_1/rs/".to_string(),
            timeout_secs: 10,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
