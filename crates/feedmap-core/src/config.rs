use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, CurrencyCode};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FEEDMAP_ENV", "development"))?;
    let log_level = or_default("FEEDMAP_LOG_LEVEL", "info");
    let feeds_path = PathBuf::from(or_default("FEEDMAP_FEEDS_PATH", "./config/feeds.yaml"));

    let default_currency = match lookup("FEEDMAP_DEFAULT_CURRENCY") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            CurrencyCode::parse(&raw)
                .map_err(|e| invalid("FEEDMAP_DEFAULT_CURRENCY", e.to_string()))?,
        ),
        _ => None,
    };

    let request_timeout_secs = parse_u64("FEEDMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FEEDMAP_USER_AGENT", "feedmap/0.1 (product-feed-mapper)");
    let max_body_bytes = parse_usize("FEEDMAP_MAX_BODY_BYTES", "10485760")?;

    let raw_header_rows = parse_usize("FEEDMAP_RAW_HEADER_ROWS", "2")?;
    if raw_header_rows == 0 {
        return Err(invalid(
            "FEEDMAP_RAW_HEADER_ROWS",
            "raw feeds always carry at least one header row".to_string(),
        ));
    }

    let max_concurrent_feeds = parse_usize("FEEDMAP_MAX_CONCURRENT_FEEDS", "3")?;

    Ok(AppConfig {
        env,
        log_level,
        feeds_path,
        default_currency,
        request_timeout_secs,
        user_agent,
        max_body_bytes,
        raw_header_rows,
        max_concurrent_feeds,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FEEDMAP_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
