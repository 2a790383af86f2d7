mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tripmap")]
#[command(about = "Turn travel-assistant replies into mapped itineraries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract and normalize destinations from an assistant reply.
    Extract {
        /// File holding the reply text, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Extract destinations, resolve boundaries, and print the map as GeoJSON.
    Render {
        /// File holding the reply text, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
        /// Only show this itinerary day.
        #[arg(long)]
        day: Option<u32>,
    },
    /// Ask the assistant, then render whatever destinations it suggests.
    Ask {
        message: String,
        /// Only show this itinerary day.
        #[arg(long)]
        day: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = tripmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract { input } => commands::run_extract(&input),
        Commands::Render { input, day } => commands::run_render(&config, &input, day).await,
        Commands::Ask { message, day } => commands::run_ask(&config, &message, day).await,
    }
}
