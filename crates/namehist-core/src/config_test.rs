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
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "NAMEHIST_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, "namehist/0.1 (username-history)");
    assert!(cfg.lolarchiver_api_key.is_none());
    assert!(cfg.twitter_api_io_key.is_none());
    assert_eq!(cfg.nitter_url, "https://nitter.net");
    assert_eq!(cfg.lolarchiver_timeout_secs, 10);
    assert_eq!(cfg.memory_lol_timeout_secs, 8);
    assert_eq!(cfg.wayback_timeout_secs, 8);
    assert_eq!(cfg.profile_timeout_secs, 10);
    assert_eq!(cfg.scrape_timeout_secs, 5);
    assert_eq!(cfg.avatar_timeout_secs, 5);
    assert_eq!(cfg.autocomplete_timeout_secs, 2);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("NAMEHIST_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NAMEHIST_BIND_ADDR"),
        "expected InvalidEnvVar(NAMEHIST_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn provider_keys_are_read_when_present() {
    let mut map = HashMap::new();
    map.insert("LOLARCHIVER_API_KEY", "lol-key");
    map.insert("TWITTER_API_IO_KEY", "tw-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.lolarchiver_api_key.as_deref(), Some("lol-key"));
    assert_eq!(cfg.twitter_api_io_key.as_deref(), Some("tw-key"));
}

#[test]
fn blank_provider_key_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("TWITTER_API_IO_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.twitter_api_io_key.is_none());
}

#[test]
fn timeout_override_is_applied() {
    let mut map = HashMap::new();
    map.insert("NAMEHIST_MEMORY_LOL_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.memory_lol_timeout_secs, 3);
}

#[test]
fn timeout_invalid_number_fails() {
    let mut map = HashMap::new();
    map.insert("NAMEHIST_PROFILE_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NAMEHIST_PROFILE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(NAMEHIST_PROFILE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("NAMEHIST_SCRAPE_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "NAMEHIST_SCRAPE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(NAMEHIST_SCRAPE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_keys() {
    let mut map = HashMap::new();
    map.insert("LOLARCHIVER_API_KEY", "super-secret-lol");
    map.insert("TWITTER_API_IO_KEY", "super-secret-tw");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"), "keys leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
