use clap::{Parser, Subcommand};
use namehist_lookup::Lookup;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "namehist-cli")]
#[command(about = "Look up the username history of a Twitter/X account")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Full lookup: merged history plus the current profile
    Lookup {
        /// Handle to look up, with or without a leading @
        username: String,
        /// Numeric account id, forwarded to providers that accept one
        #[arg(long)]
        id: Option<String>,
        /// Include per-provider reports in the output
        #[arg(long)]
        debug: bool,
    },
    /// Username history only, without profile enrichment
    History {
        /// Handle to look up; optional when --id is given
        username: Option<String>,
        /// Numeric account id
        #[arg(long)]
        id: Option<String>,
    },
    /// Current profile for a handle
    Profile { username: String },
    /// Autocomplete suggestion for a partial handle
    Suggest { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = namehist_core::load_app_config()?;

    // stdout carries the JSON result; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lookup = Lookup::from_config(&config)?;

    let output = match cli.command {
        Commands::Lookup {
            username,
            id,
            debug,
        } => {
            let mut result = lookup.aggregate(Some(&username), id.as_deref()).await?;
            if !debug {
                result.sources.clear();
            }
            serde_json::to_value(result)?
        }
        Commands::History { username, id } => {
            let report = lookup.history(username.as_deref(), id.as_deref()).await?;
            serde_json::to_value(report)?
        }
        Commands::Profile { username } => serde_json::to_value(lookup.enrich(&username).await?)?,
        Commands::Suggest { query } => json!({ "suggestions": lookup.suggest(&query).await }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
