//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port, body limit)
    pub server: ServerSettings,

    /// Storage backend configuration
    pub database: DatabaseSettings,

    /// Basic authentication settings
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Paging defaults for list requests
    pub collections: CollectionSettings,

    /// Account created at startup, if configured
    #[serde(default)]
    pub seed_user: Option<SeedUserSettings>,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,

    /// Largest request body an entity handler will read
    pub max_body_bytes: usize,
}

/// Which repository implementation backs the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables, lost on exit
    Memory,
    /// SQLite through sqlx
    Sqlite,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,

    /// Database connection URL (sqlite backend only)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Basic authentication settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Realm announced in `WWW-Authenticate` challenges
    pub realm: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,

    /// Request headers browsers may send
    pub allowed_headers: Vec<String>,
}

/// Paging defaults applied to list requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionSettings {
    /// Page size when the request names none
    pub default_page_size: u64,

    /// Upper bound on any requested page size
    pub max_page_size: u64,
}

/// User created at startup so the API has someone to authenticate as.
#[derive(Clone, Deserialize)]
pub struct SeedUserSettings {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub second_name: String,
}

impl std::fmt::Debug for SeedUserSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUserSettings")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("second_name", &self.second_name)
            .finish()
    }
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the paging bounds are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.max_body_bytes", 1_048_576_i64)?
            .set_default("database.backend", "memory")?
            .set_default("database.url", "sqlite://entitycoll.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.realm", "entitycoll")?
            .set_default("cors.allowed_origins", vec!["*"])?
            .set_default("cors.allowed_headers", vec!["Authorization", "Content-Type"])?
            .set_default("collections.default_page_size", 10)?
            .set_default("collections.max_page_size", 100)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("cors.allowed_headers")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.collections.validate()?;
                Ok(settings)
            })
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl CollectionSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Message(
                "collection page sizes must be positive".into(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Message(format!(
                "default page size {} exceeds max page size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}
