//! citytime - a small city registry that reports the current time in each city

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citytime::api::{self, AppState};
use citytime::config::Config;
use citytime::timezone::{TimezoneCatalog, WorldTimeClient};

#[derive(Parser)]
#[command(name = "citytime")]
#[command(about = "Keep a list of cities and report the current time in each")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.citytime/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the timezones accepted for new cities
    Timezones {
        /// Only show timezones starting with this prefix
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print the current datetime for a timezone
    Time {
        /// Timezone identifier, e.g. Europe/London
        timezone: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("citytime={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    let _ = dotenvy::dotenv();

    // Load config
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.http_port = port;
            }

            let state = AppState::initialize(&config).await?;
            let router = api::create_router(state);

            let addr = config.listen_addr();
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!("citytime server running at http://localhost:{}", config.http_port);
            println!("  Cities:   http://localhost:{}/cities", config.http_port);
            println!("  API Docs: http://localhost:{}/api/docs", config.http_port);
            println!("  Health:   http://localhost:{}/health", config.http_port);

            axum::serve(listener, router).await?;
        }

        Commands::Timezones { filter } => {
            config.validate()?;
            let client = WorldTimeClient::new(&config.upstream)?;
            let catalog = TimezoneCatalog::load(&client).await?;

            let zones: Vec<&str> = catalog
                .sorted()
                .into_iter()
                .filter(|z| filter.as_deref().map_or(true, |prefix| z.starts_with(prefix)))
                .collect();

            if zones.is_empty() {
                println!("No timezones found");
            } else {
                for zone in &zones {
                    println!("{}", zone);
                }
                println!("\n{} of {} timezones", zones.len(), catalog.len());
            }
        }

        Commands::Time { timezone } => {
            config.validate()?;
            let client = WorldTimeClient::new(&config.upstream)?;
            let datetime = client.fetch_datetime(&timezone).await?;
            println!("{}  {}", timezone, datetime);
        }
    }

    Ok(())
}
