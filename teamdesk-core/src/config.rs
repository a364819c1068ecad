//! Layered configuration for the TeamDesk backend
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, `$TEAMDESK_CONFIG`, or `~/.teamdesk/config.toml`)
//! 3. Environment (`DATABASE_URL`, `NODE_ENV`, `GEMINI_API_KEY`, `PORT`, ...)
//!
//! CLI flags are applied on top by the binary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Fallback database when `DATABASE_URL` is unset outside production
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/teamdesk";

const REDACTED: &str = "***";

/// `scheme://user:password@` - capture everything up to the password
static URL_PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(://[^:/@]+:)[^@]+@").expect("invalid url password regex"));

/// Deployment environment, read from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// Unknown values fall back to development.
    pub fn from_node_env(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Who new records are attributed to, and the mock login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSettings {
    pub default_owner_name: String,
    pub default_owner_avatar: String,
    pub demo_email: String,
    pub demo_password: String,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self {
            default_owner_name: "Alex Johnson".to_string(),
            default_owner_avatar: "https://i.pravatar.cc/150?u=user-1".to_string(),
            demo_email: "alex@example.com".to_string(),
            demo_password: "password".to_string(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamdeskConfig {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub gemini: GeminiSettings,
    pub team: TeamSettings,
}

impl TeamdeskConfig {
    /// Load config from file (if any) and the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Load with a custom environment lookup.
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::resolve_path(explicit_path, &lookup) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env(&lookup)?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file path: ~/.teamdesk/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".teamdesk")
            .join("config.toml")
    }

    fn resolve_path<F>(explicit_path: Option<&Path>, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit_path {
            return Some(path.to_path_buf());
        }

        if let Some(path) = non_empty(lookup("TEAMDESK_CONFIG")) {
            return Some(PathBuf::from(path));
        }

        let default = Self::default_path();
        default.exists().then_some(default)
    }

    /// Overlay environment variables. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = non_empty(lookup("NODE_ENV")) {
            self.environment = Environment::from_node_env(&v);
        }
        if let Some(v) = non_empty(lookup("DATABASE_URL")) {
            self.database.url = Some(v);
        }
        if let Some(v) = non_empty(lookup("PORT")) {
            self.server.port = v.trim().parse().map_err(|_| {
                CoreError::config(format!("PORT must be a port number, got '{}'", v))
            })?;
        }
        if let Some(v) = non_empty(lookup("TEAMDESK_HOST")) {
            self.server.host = v;
        }
        if let Some(v) = non_empty(lookup("TEAMDESK_CORS_ORIGINS")) {
            self.server.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }
        if let Some(v) = non_empty(lookup("GEMINI_API_KEY")) {
            self.gemini.api_key = Some(v);
        }
        if let Some(v) = non_empty(lookup("GEMINI_MODEL")) {
            self.gemini.model = v;
        }

        Ok(())
    }

    /// Database URL to connect to.
    ///
    /// Production refuses to guess; elsewhere a local default is used.
    pub fn database_url(&self) -> Result<String> {
        match &self.database.url {
            Some(url) => Ok(url.clone()),
            None if self.environment.is_production() => Err(CoreError::config(
                "DATABASE_URL must be set when NODE_ENV=production",
            )),
            None => Ok(DEFAULT_DATABASE_URL.to_string()),
        }
    }

    /// Whether the database connection must use TLS.
    pub fn database_requires_tls(&self) -> bool {
        self.environment.is_production()
    }

    /// Copy safe to print: secrets masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.database.url = copy
            .database
            .url
            .map(|url| URL_PASSWORD_RE.replace(&url, format!("${{1}}{}@", REDACTED)).into_owned());
        if copy.gemini.api_key.is_some() {
            copy.gemini.api_key = Some(REDACTED.to_string());
        }
        copy.team.demo_password = REDACTED.to_string();
        copy
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
