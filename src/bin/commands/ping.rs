use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::time::Instant;
use ugc_schema::{UgcConfig, UgcStore};

/// Arguments for the Ping command
#[derive(Args)]
pub struct PingArgs {
    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PingResult {
    endpoint: String,
    server_version: String,
    round_trip_ms: f64,
}

pub async fn run(config: &UgcConfig, args: PingArgs) -> Result<()> {
    let start = Instant::now();
    let store = UgcStore::connect(config).await?;
    let round_trip_ms = start.elapsed().as_secs_f64() * 1000.0;

    let server_version = store.server_version().await?;

    if args.json {
        let result = PingResult {
            endpoint: config.redacted_uri(),
            server_version,
            round_trip_ms,
        };
        return super::print_json(&result, false);
    }

    println!(
        "✓ {} reachable ({:.1} ms), MongoDB {}",
        config.redacted_uri(),
        round_trip_ms,
        server_version
    );

    Ok(())
}
