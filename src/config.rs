//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

use crate::service::MergePolicy;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Public domain (e.g., "dashboard.example.com")
    pub domain: String,
    /// Protocol ("http" or "https")
    pub protocol: String,
}

impl ServerConfig {
    /// Get the base URL for the instance
    ///
    /// # Returns
    /// Full URL like "https://dashboard.example.com"
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.domain)
    }
}

/// Remote placeholder API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the REST API (e.g., "https://jsonplaceholder.typicode.com")
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

/// Local persisted store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON key/value file.
    ///
    /// When omitted the store lives in memory only.
    pub path: Option<PathBuf>,
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session secret key (32+ bytes)
    pub session_secret: String,
    /// Session max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
}

/// Dashboard preview configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Number of records shown per dashboard section (default: 4)
    pub preview_count: usize,
    /// Post id that is always ordered last (default: 1)
    pub sentinel_id: u64,
    /// Which source wins when a local and a remote post share an id
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

/// Page sizes per resource listing
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    pub posts: usize,
    pub albums: usize,
    pub photos: usize,
    pub comments: usize,
    pub users: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> String {
        let level = self.level.to_ascii_lowercase();
        format!("placeboard={level},tower_http={level}")
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (DASHBOARD__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.domain", "localhost")?
            .set_default("server.protocol", "http")?
            .set_default("remote.base_url", "https://jsonplaceholder.typicode.com")?
            .set_default("remote.timeout_seconds", 10)?
            .set_default("remote.user_agent", "Placeboard/0.1.0")?
            .set_default("store.path", "data/store.json")?
            .set_default("auth.session_max_age", 604800)?
            .set_default("dashboard.preview_count", 4)?
            .set_default("dashboard.sentinel_id", 1)?
            .set_default("dashboard.merge_policy", "remote_wins")?
            .set_default("pagination.posts", 10)?
            .set_default("pagination.albums", 12)?
            .set_default("pagination.photos", 12)?
            .set_default("pagination.comments", 10)?
            .set_default("pagination.users", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (DASHBOARD__*)
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn should_use_secure_cookies(&self) -> bool {
        self.server.protocol.eq_ignore_ascii_case("https")
    }

    pub(crate) fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        const MIN_SESSION_SECRET_BYTES: usize = 32;

        if self.auth.session_secret.as_bytes().len() < MIN_SESSION_SECRET_BYTES {
            return Err(AppError::Config(format!(
                "auth.session_secret must be at least {} bytes",
                MIN_SESSION_SECRET_BYTES
            )));
        }

        if self.auth.session_max_age <= 0 {
            return Err(AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        let remote = url::Url::parse(&self.remote.base_url).map_err(|e| {
            AppError::Config(format!("remote.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(remote.scheme(), "http" | "https") {
            return Err(AppError::Config(
                "remote.base_url must use http or https".to_string(),
            ));
        }

        if self.remote.timeout_seconds == 0 {
            return Err(AppError::Config(
                "remote.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.dashboard.preview_count == 0 {
            return Err(AppError::Config(
                "dashboard.preview_count must be greater than 0".to_string(),
            ));
        }

        let sizes = [
            ("pagination.posts", self.pagination.posts),
            ("pagination.albums", self.pagination.albums),
            ("pagination.photos", self.pagination.photos),
            ("pagination.comments", self.pagination.comments),
            ("pagination.users", self.pagination.users),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(AppError::Config(format!("{name} must be greater than 0")));
        }

        if !LoggingConfig::LEVELS
            .iter()
            .any(|level| self.logging.level.eq_ignore_ascii_case(level))
        {
            return Err(AppError::Config(format!(
                "logging.level must be one of {}",
                LoggingConfig::LEVELS.join(", ")
            )));
        }

        if !self.logging.is_json() && !self.logging.format.eq_ignore_ascii_case("pretty") {
            return Err(AppError::Config(
                "logging.format must be \"pretty\" or \"json\"".to_string(),
            ));
        }

        Ok(())
    }
}
