use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration shared by the server and the CLI.
///
/// Provider credentials are optional: a provider whose key is absent is
/// simply not constructed.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub lolarchiver_api_key: Option<String>,
    pub twitter_api_io_key: Option<String>,
    pub nitter_url: String,
    pub lolarchiver_timeout_secs: u64,
    pub memory_lol_timeout_secs: u64,
    pub wayback_timeout_secs: u64,
    pub profile_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub avatar_timeout_secs: u64,
    pub autocomplete_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field(
                "lolarchiver_api_key",
                &self.lolarchiver_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "twitter_api_io_key",
                &self.twitter_api_io_key.as_ref().map(|_| "[redacted]"),
            )
            .field("nitter_url", &self.nitter_url)
            .field("lolarchiver_timeout_secs", &self.lolarchiver_timeout_secs)
            .field("memory_lol_timeout_secs", &self.memory_lol_timeout_secs)
            .field("wayback_timeout_secs", &self.wayback_timeout_secs)
            .field("profile_timeout_secs", &self.profile_timeout_secs)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field("avatar_timeout_secs", &self.avatar_timeout_secs)
            .field("autocomplete_timeout_secs", &self.autocomplete_timeout_secs)
            .finish()
    }
}
