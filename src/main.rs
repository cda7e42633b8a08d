mod logging;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use coinspot_updater::repl::Repl;
use coinspot_updater::rest::endpoints::private;
use coinspot_updater::sheets::GoogleSheetsClient;
use coinspot_updater::{CoinSpotClient, Config, Updater};

/// Longest `watch --interval`, one week.
const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Parser)]
#[command(
    name = "coinspot-updater",
    version,
    about = "Write CoinSpot portfolio figures into a Google Sheet"
)]
struct AppCli {
    /// JSON config file; environment variables fill in anything it leaves out
    #[arg(short, long, global = true, env = "COINSPOT_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive command loop (default)
    Repl,
    /// Update the spreadsheet now and then every interval
    Watch {
        /// Minutes between updates, at most one week
        #[arg(
            long,
            default_value_t = 60,
            value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES)
        )]
        interval: u64,
    },
    /// Make one read-only private call and print the response
    Call {
        /// Path below /api/ro/, e.g. my/balances
        path: String,
    },
    /// Update the spreadsheet once
    Update,
}

fn with_sheet(
    config: &Config,
    exchange: CoinSpotClient,
) -> Result<Updater<CoinSpotClient, GoogleSheetsClient>> {
    let sheet = config
        .sheets_client()
        .context("configuring Google Sheets client")?;
    Ok(Updater::new(exchange, sheet))
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let file = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    Ok(file.or_env()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let args = AppCli::parse();
    let config = load_config(args.config.as_ref())?;

    let exchange = config
        .coinspot_client()
        .context("configuring CoinSpot client")?;

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Call { path } => {
            let path = private::read_only(&path);
            println!("{}", exchange.private_call(&path, "{}").await?);
        }
        Commands::Update => {
            let report = with_sheet(&config, exchange)?.update_spreadsheet().await?;
            println!("{report}");
        }
        Commands::Watch { interval } => {
            let updater = with_sheet(&config, exchange)?;
            info!(minutes = interval, "watching portfolio");
            updater
                .run_periodic(Duration::from_secs(interval * 60), None)
                .await;
        }
        Commands::Repl => {
            let updater = with_sheet(&config, exchange)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            Repl::new(updater).run(stdin, &mut stdout).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_interval_bounds() {
        let args = AppCli::try_parse_from(["coinspot-updater", "watch", "--interval", "10080"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Watch { interval: 10080 })));

        for bad in ["0", "10081", "18446744073709551615"] {
            let result = AppCli::try_parse_from(["coinspot-updater", "watch", "--interval", bad]);
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_default_command_is_repl() {
        let args = AppCli::try_parse_from(["coinspot-updater"]).unwrap();
        assert!(args.command.is_none());
    }
}
