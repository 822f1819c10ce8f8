//! Apodimo CLI - Command line interface for Azure DevOps to GitHub migrations

mod commands;

use apodimo_core::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::MigrateArgs;

/// Filter used with --verbose when RUST_LOG is unset
const VERBOSE_FILTER: &str =
    "info,apodimo=debug,apodimo_core=debug,apodimo_azdo=debug,apodimo_github=debug";

/// Apodimo: migrate Azure DevOps projects to GitHub
#[derive(Parser, Debug)]
#[command(name = "apodimo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Migrate an Azure DevOps project into a GitHub organization
    #[command(visible_alias = "m")]
    Migrate(MigrateArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { VERBOSE_FILTER } else { "info" })
    });
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let concurrency = match &cli.command {
        Some(Commands::Migrate(args)) => args.concurrency,
        _ => None,
    };
    let config = Config::load_with_overrides(concurrency)?;

    if cli.verbose {
        tracing::debug!(
            concurrency = config.migration.concurrency,
            temp_dir = ?config.migration.temp_dir,
            timeout = ?config.http.timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("apodimo {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Migrate(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Apodimo Configuration");
            println!("=====================");
            println!();
            println!("Migration Settings:");
            println!("  concurrency: {}", config.migration.concurrency);
            println!(
                "  temp_dir: {}",
                config
                    .migration
                    .temp_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(system temp)".to_string())
            );
            println!();
            println!("HTTP Settings:");
            println!(
                "  timeout: {}",
                config
                    .http
                    .timeout
                    .map(|t| format!("{:?}", t))
                    .unwrap_or_else(|| "(client default)".to_string())
            );
            println!("  azure_devops_api_version: {}", config.http.azure_devops_api_version);
            println!("  github_api_url: {}", config.http.github_api_url);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Apodimo - Azure DevOps to GitHub migration");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
