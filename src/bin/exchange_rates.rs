//! `exchange-rates <days>`: prints EUR/USD rates for the last `days` days.
//!
//! Uses batch semantics: any provider failure aborts the run with a
//! non-zero exit status and nothing on stdout.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use exchange_relay::config::RelayConfig;
use exchange_relay::domain::RateRequest;
use exchange_relay::service::RateLookupClient;

/// Fetch EUR/USD sale and purchase rates from PrivatBank.
#[derive(Debug, Parser)]
#[command(name = "exchange-rates", version, about)]
struct Cli {
    /// Number of days to fetch, counting back from today (1-10).
    #[arg(allow_negative_numbers = true)]
    days: i64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli.days).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(days: i64) -> anyhow::Result<String> {
    let request = RateRequest::batch(days)?;
    let config = RelayConfig::from_env().context("loading configuration")?;
    let client = RateLookupClient::new(&config.rates_api_url, config.rates_request_timeout)?;
    let table = client
        .fetch(&request)
        .await
        .context("fetching exchange rates")?;
    Ok(serde_json::to_string_pretty(&table)?)
}
