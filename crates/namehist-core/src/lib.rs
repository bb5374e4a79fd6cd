//! Shared domain types and configuration for namehist.

pub mod app_config;
pub mod config;
pub mod error;
pub mod profile;
pub mod records;
pub mod username;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use profile::ProfileInfo;
pub use records::{AggregatedResult, DateSpan, ProviderReport, ReportStatus, UsernameRecord};
pub use username::{format_display_name, normalize_username, placeholder_avatar_url};
