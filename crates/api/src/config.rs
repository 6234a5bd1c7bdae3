//! Process configuration read from the environment.

use std::str::FromStr;

use axum::http::HeaderValue;

/// Why the environment could not be turned into a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration.
///
/// Everything except `DATABASE_URL` has a default suitable for local
/// development:
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `4000`                  |
/// | `APP_ENV`              | `development`           |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
/// | `DATABASE_URL`         | required                |
/// | `DB_MAX_CONNECTIONS`   | `25`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by the healthcheck (`development`, `staging`, `production`).
    pub env: String,
    /// Parsed from the comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub db_max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let cors_origins = vars
            .string("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: vars.string("HOST", "0.0.0.0"),
            port: vars.parsed("PORT", 4000)?,
            env: vars.string("APP_ENV", "development"),
            cors_origins,
            request_timeout_secs: vars.parsed("REQUEST_TIMEOUT_SECS", 30)?,
            database_url: vars.required("DATABASE_URL")?,
            db_max_connections: vars.parsed("DB_MAX_CONNECTIONS", 25)?,
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn string(&self, name: &str, default: &str) -> String {
        (self.0)(name).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        (self.0)(name)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match (self.0)(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: name,
                value: raw,
            }),
        }
    }
}
