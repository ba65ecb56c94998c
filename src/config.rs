//! Process configuration read from the environment (after `dotenv`).

use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How bearer tokens are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// HS256 with a shared secret.
    Secret(String),
    /// Supabase-issued tokens checked against the project's JWKS.
    Supabase { project_ref: String, anon_key: String },
}

/// Cache lifetimes for the Redis layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub user_ttl: Duration,
    pub clients_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            user_ttl: Duration::from_secs(900),   // 15 minutes
            clients_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            user_ttl: parse_duration_secs("CACHE_TTL_USERS", defaults.user_ttl),
            clients_ttl: parse_duration_secs("CACHE_TTL_CLIENTS", defaults.clients_ttl),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let redis_url = required("REDIS_URL")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let auth = match env::var("AUTH_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => AuthConfig::Secret(secret),
            _ => {
                let supabase_url = required("SUPABASE_URL")?;
                AuthConfig::Supabase {
                    project_ref: supabase_project_ref(&supabase_url)?,
                    anon_key: required("SUPABASE_ANON_KEY")?,
                }
            }
        };

        Ok(Self {
            database_url,
            redis_url,
            port,
            auth,
            cache: CacheConfig::from_env(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Extract `PROJECT` from `https://PROJECT.supabase.co`.
pub fn supabase_project_ref(url: &str) -> Result<String, ConfigError> {
    url.trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: "expected https://PROJECT.supabase.co".to_string(),
        })
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_duration_secs(env_var: &str, default: Duration) -> Duration {
    env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
