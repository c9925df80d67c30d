use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use ugc_schema::UgcConfig;

mod commands;

use commands::config::ConfigArgs;
use commands::init::InitArgs;
use commands::ping::PingArgs;
use commands::reset::ResetArgs;
use commands::status::StatusArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ugc-schema/ugc-schema.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the declared collections and unique indexes.
    Init(InitArgs),

    /// Show the live schema status of the store.
    Status(StatusArgs),

    /// Check that the configured deployment is reachable.
    Ping(PingArgs),

    /// Drop the declared collections.
    Reset(ResetArgs),

    /// Show the effective configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    // .env files carry the MONGO_* variables in local deployments
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = UgcConfig::new(&cli.config)?;

    match cli.command {
        Commands::Init(args) => commands::init::run(&config, args).await,
        Commands::Status(args) => commands::status::run(&config, args).await,
        Commands::Ping(args) => commands::ping::run(&config, args).await,
        Commands::Reset(args) => commands::reset::run(&config, args).await,
        Commands::Config(args) => commands::config::run(&config, args),
    }
}
