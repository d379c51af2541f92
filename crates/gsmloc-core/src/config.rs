use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_LOOKUP_URL: &str = "http://www.opencellid.org/cell/get";
pub const DEFAULT_LATITUDE_PATH: &str = "/rsp/cell/@lat";
pub const DEFAULT_LONGITUDE_PATH: &str = "/rsp/cell/@lon";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
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
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // Timeouts in whole seconds, never zero.
    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match or_default(var, default).parse::<u64>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(secs) => Ok(secs),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(invalid(var, "must not be empty".to_string()));
        }
        Ok(raw)
    };

    let env = parse_environment(&or_default("GSMLOC_ENV", "development"))?;

    let bind_addr = or_default("GSMLOC_BIND_ADDR", "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("GSMLOC_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("GSMLOC_LOG_LEVEL", "info");
    let api_keys = parse_api_keys(&or_default("GSMLOC_API_KEYS", ""));

    let lookup_url = non_empty("GSMLOC_LOOKUP_URL", DEFAULT_LOOKUP_URL)?;
    let opencellid_api_key = lookup("GSMLOC_OPENCELLID_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let lookup_timeout_secs = parse_secs("GSMLOC_LOOKUP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GSMLOC_USER_AGENT", "gsmloc/0.1 (cell-location)");
    let latitude_path = non_empty("GSMLOC_LATITUDE_PATH", DEFAULT_LATITUDE_PATH)?;
    let longitude_path = non_empty("GSMLOC_LONGITUDE_PATH", DEFAULT_LONGITUDE_PATH)?;

    let gammu_bin = non_empty("GSMLOC_GAMMU_BIN", "gammu")?;
    let gammurc_path = lookup("GSMLOC_GAMMURC").ok().map(PathBuf::from);
    let modem_profile = parse_u32("GSMLOC_MODEM_PROFILE", "0")?;
    let modem_connect_retries = parse_u32("GSMLOC_MODEM_CONNECT_RETRIES", "3")?;
    let modem_connect_timeout_secs = parse_secs("GSMLOC_MODEM_CONNECT_TIMEOUT_SECS", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_keys,
        lookup_url,
        opencellid_api_key,
        lookup_timeout_secs,
        user_agent,
        latitude_path,
        longitude_path,
        gammu_bin,
        gammurc_path,
        modem_profile,
        modem_connect_retries,
        modem_connect_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GSMLOC_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
