//! Coin CLI
//!
//! Command-line interface for the caching coin market-data client.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use coin_client::{CoinMarketConfig, CoinMarketService};
use coin_types::CurrencyId;

#[derive(Parser)]
#[command(name = "coin")]
#[command(author, version, about = "CoinMarketCap market-data CLI", long_about = None)]
struct Cli {
    /// Base URL of the upstream API
    #[arg(long, env = "COIN_API_URL")]
    api_url: Option<String>,

    /// Upstream API token
    #[arg(long, env = "COIN_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List all currencies
    List {
        /// Only print the first N records
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Get currency details by id
    Get {
        /// Currency id (positive integer)
        id: CurrencyId,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,coin_client=info,coin_cli=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    // Logged before validation so a missing token shows up here too.
    tracing::info!(
        token_loaded = token_loaded(cli.api_token.as_deref()),
        "Resolving configuration"
    );

    // Flags win over the environment; everything else comes from COIN_* vars.
    let config = CoinMarketConfig::from_lookup(|var| match var {
        "COIN_API_TOKEN" => cli.api_token.clone(),
        "COIN_API_URL" => cli.api_url.clone(),
        _ => std::env::var(var).ok(),
    })?;
    tracing::info!(base_url = %config.base_url, "Configuration loaded");

    let service = CoinMarketService::from_config(&config);

    let outcome = run(&service, cli.command).await;
    service.close().await;

    match outcome? {
        Some(output) => {
            println!("{}", output);
            Ok(())
        }
        None => std::process::exit(1),
    }
}

/// True when a non-blank token came from `--api-token` or `COIN_API_TOKEN`.
fn token_loaded(token: Option<&str>) -> bool {
    token.is_some_and(|t| !t.trim().is_empty())
}

/// Runs one command. `None` means "not found" and maps to exit status 1.
async fn run(
    service: &CoinMarketService<coin_client::HttpTransport>,
    command: Commands,
) -> Result<Option<String>> {
    match command {
        Commands::List { limit } => {
            let mut currencies = service.list_currencies().await?;
            if let Some(limit) = limit {
                currencies.truncate(limit);
            }
            Ok(Some(serde_json::to_string_pretty(&currencies)?))
        }
        Commands::Get { id } => {
            let record = service.get_currency(id).await?;
            if record.is_empty() {
                eprintln!("✗ Currency {} not found", id);
                return Ok(None);
            }
            Ok(Some(serde_json::to_string_pretty(&record)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_get_parses_positive_id() {
        let cli = Cli::try_parse_from(["coin", "--api-token", "t", "get", "1027"]).unwrap();
        match cli.command {
            Commands::Get { id } => assert_eq!(id.get(), 1027),
            _ => panic!("expected get command"),
        }
    }

    #[test]
    fn test_get_rejects_zero_and_garbage() {
        assert!(Cli::try_parse_from(["coin", "get", "0"]).is_err());
        assert!(Cli::try_parse_from(["coin", "get", "btc"]).is_err());
    }

    #[test]
    fn test_list_limit() {
        let cli = Cli::try_parse_from(["coin", "list", "--limit", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::List { limit: Some(5) }));
    }

    #[test]
    fn test_token_loaded_ignores_blank_values() {
        assert!(token_loaded(Some("abc")));
        assert!(!token_loaded(Some("  ")));
        assert!(!token_loaded(None));
    }
}
