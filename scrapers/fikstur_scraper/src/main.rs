use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fikstur_scraper::{
    config::ScraperConfig,
    fixture_scraper::FixtureScraper,
    types::FixtureReport,
    web::{self, AppState},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Karaman FK fixture API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Fetch the fixture page once and print the result
    Fetch {
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Extract fixtures from a saved HTML file
    Parse {
        /// Path to the HTML file to process
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn print_report(report: &FixtureReport, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ScraperConfig::from_env();
    info!("Browser mode: {:?}", config.browser.mode);

    let scraper = FixtureScraper::from_config(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            web::serve(&config.bind_addr(), AppState::new(scraper)).await?;
        }
        Commands::Fetch { pretty } => {
            info!("Fetching fixtures from {}", scraper.target_url());
            let report = scraper.fetch_fixtures().await?;
            print_report(&report, pretty)?;
        }
        Commands::Parse { file } => {
            let html = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            info!("Processing saved page: {:?}", file);
            print_report(&scraper.parse_html(&html), true)?;
        }
    }

    Ok(())
}
