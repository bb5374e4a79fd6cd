use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank keys in a .env file count as "not configured".
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            });
        }
        Ok(secs)
    };

    let env = parse_environment(&or_default("NAMEHIST_ENV", "development"))?;
    let bind_addr = parse_addr("NAMEHIST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NAMEHIST_LOG_LEVEL", "info");
    let user_agent = or_default("NAMEHIST_USER_AGENT", "namehist/0.1 (username-history)");

    let lolarchiver_api_key = optional("LOLARCHIVER_API_KEY");
    let twitter_api_io_key = optional("TWITTER_API_IO_KEY");
    let nitter_url = or_default("NAMEHIST_NITTER_URL", "https://nitter.net");

    let lolarchiver_timeout_secs = parse_secs("NAMEHIST_LOLARCHIVER_TIMEOUT_SECS", "10")?;
    let memory_lol_timeout_secs = parse_secs("NAMEHIST_MEMORY_LOL_TIMEOUT_SECS", "8")?;
    let wayback_timeout_secs = parse_secs("NAMEHIST_WAYBACK_TIMEOUT_SECS", "8")?;
    let profile_timeout_secs = parse_secs("NAMEHIST_PROFILE_TIMEOUT_SECS", "10")?;
    let scrape_timeout_secs = parse_secs("NAMEHIST_SCRAPE_TIMEOUT_SECS", "5")?;
    let avatar_timeout_secs = parse_secs("NAMEHIST_AVATAR_TIMEOUT_SECS", "5")?;
    let autocomplete_timeout_secs = parse_secs("NAMEHIST_AUTOCOMPLETE_TIMEOUT_SECS", "2")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        lolarchiver_api_key,
        twitter_api_io_key,
        nitter_url,
        lolarchiver_timeout_secs,
        memory_lol_timeout_secs,
        wayback_timeout_secs,
        profile_timeout_secs,
        scrape_timeout_secs,
        avatar_timeout_secs,
        autocomplete_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NAMEHIST_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
