//! Server configuration for the Medisae web application.
//!
//! This module provides configuration types for the server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDISAE_SERVER_PORT` | 8080 | Server port |
//! | `MEDISAE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `MEDISAE_LOG_LEVEL` | info | Log level |
//! | `MEDISAE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `MEDISAE_ENABLE_CORS` | false | Enable CORS |
//! | `MEDISAE_CORS_ORIGINS` | * | Allowed origins |
//! | `MEDISAE_STORAGE_BACKEND` | postgres | `postgres` or `memory` |
//! | `MEDISAE_DATABASE_URL` | | PostgreSQL URL (falls back to `MEDISAE_PG_*`) |
//! | `MEDISAE_MONGODB_URL` | | MongoDB URL for ingredient documents |
//! | `MEDISAE_MONGODB_DATABASE` | medicaments_db | MongoDB database |
//! | `MEDISAE_SIMILARITY_THRESHOLD` | 0.3 | Minimum trigram similarity |
//! | `MEDISAE_BCRYPT_COST` | 12 | bcrypt work factor |
//! | `MEDISAE_SECURE_COOKIES` | false | Mark the session cookie `Secure` |
//! | `MEDISAE_SESSION_TTL` | 86400 | Session lifetime (seconds) |
//!
//! # Example
//!
//! ```rust
//! use medisae_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use std::time::Duration;

use clap::Parser;
use medisae_persistence::search::{DEFAULT_SIMILARITY_THRESHOLD, SimilarityThreshold};

/// Lowest bcrypt work factor the hasher accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest bcrypt work factor the hasher accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Default session lifetime, one day.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Storage backend used for the catalog and the accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendMode {
    /// PostgreSQL via deadpool-postgres.
    #[default]
    Postgres,
    /// In-process store seeded with a demonstration catalog.
    Memory,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Postgres => write!(f, "postgres"),
            StorageBackendMode::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackendMode::Postgres),
            "memory" | "in-memory" => Ok(StorageBackendMode::Memory),
            other => Err(format!(
                "unknown storage backend '{}', expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// Server configuration for the Medisae web application.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "medisae")]
#[command(about = "Medisae medication browser")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "MEDISAE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "MEDISAE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDISAE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "MEDISAE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "MEDISAE_ENABLE_CORS", default_value = "false")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "MEDISAE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Storage backend (postgres, memory).
    #[arg(long, env = "MEDISAE_STORAGE_BACKEND", default_value = "postgres")]
    pub storage_backend: String,

    /// PostgreSQL connection string.
    #[arg(long, env = "MEDISAE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB connection string for ingredient documents.
    #[arg(long, env = "MEDISAE_MONGODB_URL")]
    pub mongodb_url: Option<String>,

    /// MongoDB database holding the `ingredients` collection.
    #[arg(long, env = "MEDISAE_MONGODB_DATABASE", default_value = "medicaments_db")]
    pub mongodb_database: String,

    /// Minimum trigram similarity a name must exceed to match the search term.
    #[arg(long, env = "MEDISAE_SIMILARITY_THRESHOLD", default_value = "0.3")]
    pub similarity_threshold: f32,

    /// bcrypt work factor for new password hashes.
    #[arg(long, env = "MEDISAE_BCRYPT_COST", default_value = "12")]
    pub bcrypt_cost: u32,

    /// Mark the session cookie `Secure` (requires HTTPS).
    #[arg(long, env = "MEDISAE_SECURE_COOKIES", default_value = "false")]
    pub secure_cookies: bool,

    /// Seconds a login session stays valid after it is created.
    #[arg(long, env = "MEDISAE_SESSION_TTL", default_value = "86400")]
    pub session_ttl: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: false,
            cors_origins: "*".to_string(),
            storage_backend: "postgres".to_string(),
            database_url: None,
            mongodb_url: None,
            mongodb_database: "medicaments_db".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            secure_cookies: false,
            session_ttl: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse_from(["medisae"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the validated similarity threshold.
    ///
    /// Falls back to the default when the configured value is out of range;
    /// [`validate`](Self::validate) reports that case at startup.
    pub fn threshold(&self) -> SimilarityThreshold {
        SimilarityThreshold::new(self.similarity_threshold).unwrap_or_default()
    }

    /// Returns how long a login session stays valid.
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(format!("Invalid storage backend: {}", e));
        }

        if let Err(e) = SimilarityThreshold::new(self.similarity_threshold) {
            errors.push(format!("Invalid similarity threshold: {}", e));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            errors.push(format!(
                "bcrypt cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            ));
        }

        if self.session_ttl == 0 {
            errors.push("Session lifetime cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, the in-memory backend and the cheapest
    /// bcrypt cost.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            storage_backend: "memory".to_string(),
            database_url: None,
            mongodb_url: None,
            mongodb_database: "medicaments_db".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            bcrypt_cost: MIN_BCRYPT_COST,
            secure_cookies: false,
            session_ttl: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.similarity_threshold, 0.3);
        assert_eq!(
            config.storage_backend_mode(),
            Ok(StorageBackendMode::Postgres)
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        // Ephemeral port 0 is only meaningful for in-process test servers.
        let errors = ServerConfig::for_testing().validate().unwrap_err();
        assert_eq!(errors, vec!["Port cannot be 0".to_string()]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = ServerConfig {
            port: 0,
            storage_backend: "sqlite".to_string(),
            similarity_threshold: 1.5,
            bcrypt_cost: 2,
            session_ttl: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().any(|e| e.contains("Port")));
        assert!(errors.iter().any(|e| e.contains("storage backend")));
        assert!(errors.iter().any(|e| e.contains("similarity")));
        assert!(errors.iter().any(|e| e.contains("bcrypt")));
        assert!(errors.iter().any(|e| e.contains("Session lifetime")));
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let at = |bcrypt_cost| ServerConfig {
            bcrypt_cost,
            ..Default::default()
        };
        assert!(at(MIN_BCRYPT_COST).validate().is_ok());
        assert!(at(MAX_BCRYPT_COST).validate().is_ok());
        assert!(at(MIN_BCRYPT_COST - 1).validate().is_err());
        assert!(at(MAX_BCRYPT_COST + 1).validate().is_err());
        assert_eq!(ServerConfig::for_testing().bcrypt_cost, MIN_BCRYPT_COST);
    }

    #[test]
    fn test_session_lifetime() {
        assert_eq!(
            ServerConfig::default().session_lifetime(),
            Duration::from_secs(86_400)
        );
        let config = ServerConfig::try_parse_from(["medisae", "--session-ttl", "60"]).unwrap();
        assert_eq!(config.session_lifetime(), Duration::from_secs(60));
    }

    #[test]
    fn test_threshold_falls_back_to_default() {
        let config = ServerConfig {
            similarity_threshold: 0.0,
            ..Default::default()
        };
        assert_eq!(config.threshold().value(), DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_storage_mode_parsing() {
        assert_eq!("Memory".parse(), Ok(StorageBackendMode::Memory));
        assert_eq!("postgresql".parse(), Ok(StorageBackendMode::Postgres));
        assert!("sqlite".parse::<StorageBackendMode>().is_err());
        assert_eq!(StorageBackendMode::Memory.to_string(), "memory");
    }

    #[test]
    fn test_cli_parsing() {
        let config = ServerConfig::try_parse_from([
            "medisae",
            "--port",
            "9000",
            "--storage-backend",
            "memory",
            "--similarity-threshold",
            "0.5",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_backend_mode(), Ok(StorageBackendMode::Memory));
        assert_eq!(config.threshold().value(), 0.5);
    }
}
