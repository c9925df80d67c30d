use anyhow::Result;
use clap::Args;
use serde::Serialize;
use ugc_schema::UgcConfig;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    endpoint: String,
    database: String,
    connect_timeout_secs: u64,
}

pub fn run(config: &UgcConfig, args: ConfigArgs) -> Result<()> {
    if args.json {
        let info = ConfigInfo {
            config_file: UgcConfig::config_file_path(),
            endpoint: config.redacted_uri(),
            database: config.db.clone(),
            connect_timeout_secs: config.connect_timeout_secs,
        };
        return super::print_json(&info, false);
    }

    println!("ugc-schema Configuration");
    println!("========================\n");
    println!("Config file:        {}", UgcConfig::config_file_path());
    println!("{}", config.summary());

    eprintln!();
    eprintln!("Settings can be overridden with MONGO_* environment variables");
    eprintln!("(MONGO_HOST, MONGO_PORT, MONGO_LOGIN, MONGO_PASSWORD, MONGO_DB).");

    Ok(())
}
