// pix_cli/src/main.rs
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use pix_cli::commands;
use pix_cli::config::Config;

#[derive(Parser)]
#[command(name = "pix")]
#[command(about = "Static PIX (BR Code) toolchain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a static PIX payload and optionally its QR images
    Generate(commands::generate::GenerateArgs),

    /// Parse a payload and check its CRC
    Verify(commands::verify::VerifyArgs),

    /// Rebuild the database schema from embedded assets
    Rebuild(commands::rebuild::RebuildArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args)?,
        Commands::Verify(args) => commands::verify::run(args)?,
        Commands::Rebuild(args) => {
            let config = Config::from_env()?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.database_url)
                .await?;
            commands::rebuild::execute(pool, args).await?;
        }
    }

    Ok(())
}
