use std::str::FromStr;

use todolist_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{var} must be between {min} and {max}, got {value}")]
    OutOfRange {
        var: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Rows per page when the request names no size (default: `2`).
    pub default_page_size: i64,
    /// Sessions untouched for this long are discarded (default: `1800`).
    pub session_idle_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`      |
    /// | `DEFAULT_PAGE_SIZE`         | `2`       |
    /// | `SESSION_IDLE_TIMEOUT_SECS` | `1800`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_var(&lookup, "PORT", 3000, "u16")?;
        let request_timeout_secs: u64 = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30, "u64")?;
        let session_idle_timeout_secs: u64 =
            parse_var(&lookup, "SESSION_IDLE_TIMEOUT_SECS", 1800, "u64")?;

        let default_page_size: i64 =
            parse_var(&lookup, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE, "integer")?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(ConfigError::OutOfRange {
                var: "DEFAULT_PAGE_SIZE",
                min: 1,
                max: MAX_PAGE_SIZE,
                value: default_page_size,
            });
        }

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            default_page_size,
            session_idle_timeout_secs,
        })
    }

    /// The page shown when a request carries no paging parameters.
    pub fn default_page(&self) -> PageRequest {
        PageRequest::first(self.default_page_size)
    }
}

fn parse_var<T, F>(
    lookup: &F,
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_page_size, 2);
        assert_eq!(config.session_idle_timeout_secs, 1800);
        assert_eq!(config.default_page(), PageRequest::first(2));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[("PORT", "8080"), ("DEFAULT_PAGE_SIZE", "10")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_page().size, 10);
    }

    #[test]
    fn malformed_port_is_rejected() {
        assert_matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn page_size_must_be_in_range() {
        assert_matches!(
            load(&[("DEFAULT_PAGE_SIZE", "0")]),
            Err(ConfigError::OutOfRange { value: 0, .. })
        );
        assert_matches!(
            load(&[("DEFAULT_PAGE_SIZE", "101")]),
            Err(ConfigError::OutOfRange { value: 101, .. })
        );
    }
}
