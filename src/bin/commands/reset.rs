use anyhow::Result;
use clap::Args;
use serde::Serialize;
use ugc_schema::{SchemaDefinitions, UgcConfig, UgcStore};

/// Arguments for the Reset command
#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[clap(long, short = 'y')]
    pub yes: bool,

    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ResetResult {
    database: String,
    dropped: Vec<String>,
}

pub async fn run(config: &UgcConfig, args: ResetArgs) -> Result<()> {
    let names: Vec<&str> = SchemaDefinitions::COLLECTIONS
        .iter()
        .map(|c| c.name)
        .collect();

    if !args.yes && !args.json {
        eprintln!(
            "This will drop the following collections from {}: {}",
            config.db,
            names.join(", ")
        );
        eprint!("Are you sure? [y/N] ");

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_ok() {
            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                eprintln!("Aborted.");
                return Ok(());
            }
        } else {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let store = UgcStore::connect(config).await?;
    store.schema().reset().await?;

    if args.json {
        let result = ResetResult {
            database: config.db.clone(),
            dropped: names.iter().map(|n| n.to_string()).collect(),
        };
        return super::print_json(&result, false);
    }

    for name in &names {
        println!("✓ dropped {}", name);
    }

    Ok(())
}
