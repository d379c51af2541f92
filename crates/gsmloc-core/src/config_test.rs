use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GSMLOC_ENV"));
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.api_keys.is_empty());
    assert_eq!(cfg.lookup_url, "http://www.opencellid.org/cell/get");
    assert!(cfg.opencellid_api_key.is_none());
    assert_eq!(cfg.lookup_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "gsmloc/0.1 (cell-location)");
    assert_eq!(cfg.latitude_path, "/rsp/cell/@lat");
    assert_eq!(cfg.longitude_path, "/rsp/cell/@lon");
    assert_eq!(cfg.gammu_bin, "gammu");
    assert!(cfg.gammurc_path.is_none());
    assert_eq!(cfg.modem_profile, 0);
    assert_eq!(cfg.modem_connect_retries, 3);
    assert_eq!(cfg.modem_connect_timeout_secs, 60);
}

#[test]
fn build_app_config_overrides() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_ENV", "production");
    map.insert("GSMLOC_BIND_ADDR", "0.0.0.0:8080");
    map.insert("GSMLOC_API_KEYS", " one , ,two");
    map.insert("GSMLOC_OPENCELLID_API_KEY", "secret");
    map.insert("GSMLOC_LONGITUDE_PATH", "/rsp/cell/@lat");
    map.insert("GSMLOC_GAMMURC", "/tmp/gammurc");
    map.insert("GSMLOC_MODEM_PROFILE", "2");
    map.insert("GSMLOC_MODEM_CONNECT_TIMEOUT_SECS", "5");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should load");

    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.api_keys, vec!["one".to_string(), "two".to_string()]);
    assert_eq!(cfg.opencellid_api_key.as_deref(), Some("secret"));
    assert_eq!(cfg.longitude_path, "/rsp/cell/@lat");
    assert_eq!(
        cfg.gammurc_path.as_deref(),
        Some(std::path::Path::new("/tmp/gammurc"))
    );
    assert_eq!(cfg.modem_profile, 2);
    assert_eq!(cfg.modem_connect_timeout_secs, 5);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSMLOC_BIND_ADDR"),
        "expected InvalidEnvVar(GSMLOC_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_profile() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_MODEM_PROFILE", "first");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSMLOC_MODEM_PROFILE"),
        "expected InvalidEnvVar(GSMLOC_MODEM_PROFILE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_connect_timeout() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_MODEM_CONNECT_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSMLOC_MODEM_CONNECT_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GSMLOC_MODEM_CONNECT_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_lookup_timeout() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_LOOKUP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "GSMLOC_LOOKUP_TIMEOUT_SECS" && reason.contains("greater than zero")),
        "expected InvalidEnvVar(GSMLOC_LOOKUP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_empty_lookup_url() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_LOOKUP_URL", "  ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GSMLOC_LOOKUP_URL"),
        "expected InvalidEnvVar(GSMLOC_LOOKUP_URL), got: {result:?}"
    );
}

#[test]
fn blank_opencellid_key_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_OPENCELLID_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.opencellid_api_key.is_none());
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("GSMLOC_API_KEYS", "bearer-secret");
    map.insert("GSMLOC_OPENCELLID_API_KEY", "ocid-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("bearer-secret"));
    assert!(!debug.contains("ocid-secret"));
    assert!(debug.contains("[redacted]"));
}
