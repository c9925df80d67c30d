use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use ugc_schema::{plan, EnsureReport, IndexCheck, UgcConfig, UgcStore};

/// Arguments for the Init command
#[derive(Args)]
pub struct InitArgs {
    /// Report what would be created without applying anything
    #[clap(long)]
    pub dry_run: bool,

    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct InitResult {
    database: String,
    dry_run: bool,
    #[serde(flatten)]
    report: EnsureReport,
}

pub async fn run(config: &UgcConfig, args: InitArgs) -> Result<()> {
    let store = UgcStore::connect(config).await?;

    let report = if args.dry_run {
        let checks = store.schema().check().await?;
        let conflicts: Vec<String> = checks
            .iter()
            .filter_map(|check| match &check.index {
                IndexCheck::Conflict(reason) => Some(format!("{}: {}", check.name, reason)),
                _ => None,
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(anyhow!(
                "Conflicting indexes present: {}",
                conflicts.join("; ")
            ));
        }
        plan(&checks)
    } else {
        store.schema().ensure().await?
    };

    if args.json || args.pretty {
        let result = InitResult {
            database: config.db.clone(),
            dry_run: args.dry_run,
            report,
        };
        return super::print_json(&result, args.pretty);
    }

    let verb = if args.dry_run {
        "would create"
    } else {
        "created"
    };
    if report.is_noop() {
        println!(
            "✓ Schema in {} already provisioned, nothing to do",
            config.db
        );
    } else {
        for name in &report.created_collections {
            println!("✓ {} collection {}", verb, name);
        }
        for name in &report.created_indexes {
            println!("✓ {} unique index {}", verb, name);
        }
        for name in &report.unchanged {
            println!("  {} unchanged", name);
        }
    }

    Ok(())
}
