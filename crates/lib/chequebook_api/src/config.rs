//! API server configuration.

use chequebook_core::auth::jwt::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, persisted_jwt_secret};

/// Deployment mode. Outside production, failed responses carry a debug
/// `error` string with the underlying cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Development,
    Production,
}

impl AppMode {
    /// `production` (any case) selects [`AppMode::Production`]; anything else is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            AppMode::Production
        } else {
            AppMode::Development
        }
    }

    pub fn exposes_error_detail(self) -> bool {
        self != AppMode::Production
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:5000").
    pub bind_addr: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: i64,
    pub app_mode: AppMode,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                     |
    /// |--------------------|---------------------------------------------|
    /// | `BIND_ADDR`        | `0.0.0.0:$PORT`, `PORT` defaulting to 5000  |
    /// | `JWT_SECRET` / `SECRET` | generated & persisted to file          |
    /// | `TOKEN_TTL_SECS`   | `86400`, at most one year                   |
    /// | `APP_MODE`         | development                                 |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with variables read through `lookup`.
    ///
    /// Only the secret file fallback touches anything outside `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = var("PORT").unwrap_or_else(|| "5000".into());
        Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| format!("0.0.0.0:{port}")),
            jwt_secret: var("JWT_SECRET")
                .or_else(|| var("SECRET"))
                .unwrap_or_else(persisted_jwt_secret),
            token_ttl_secs: var("TOKEN_TTL_SECS")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| (1..=MAX_TOKEN_TTL_SECS).contains(v))
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            app_mode: var("APP_MODE")
                .map(|v| AppMode::parse(&v))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_hides_detail() {
        assert_eq!(AppMode::parse("PRODUCTION"), AppMode::Production);
        assert!(!AppMode::parse("production").exposes_error_detail());
        assert!(AppMode::parse("staging").exposes_error_detail());
        assert!(AppMode::default().exposes_error_detail());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn port_builds_the_bind_address() {
        let config = ApiConfig::from_lookup(lookup(&[("PORT", "8080"), ("JWT_SECRET", "s")]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.app_mode, AppMode::Development);
    }

    #[test]
    fn secret_falls_back_to_secret_var() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", ""),
            ("SECRET", "legacy"),
            ("BIND_ADDR", "127.0.0.1:9"),
            ("TOKEN_TTL_SECS", "0"),
            ("APP_MODE", "production"),
        ]));
        assert_eq!(config.jwt_secret, "legacy");
        assert_eq!(config.bind_addr, "127.0.0.1:9");
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.app_mode, AppMode::Production);
    }

    #[test]
    fn oversized_ttl_falls_back_to_default() {
        let too_long = (MAX_TOKEN_TTL_SECS + 1).to_string();
        let config = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", too_long.as_str())]));
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);

        let config = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "600")]));
        assert_eq!(config.token_ttl_secs, 600);
    }
}
