use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use ugc_schema::{summarize, CollectionCheck, IndexCheck, SchemaStatus, UgcConfig, UgcStore};

/// Arguments for the Status command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct StoreStatus {
    database: String,
    status: SchemaStatus,
    collections: Vec<CollectionCheck>,
}

#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "collection")]
    name: String,
    #[tabled(rename = "exists")]
    exists: String,
    #[tabled(rename = "documents")]
    documents: String,
    #[tabled(rename = "unique index")]
    index: String,
}

impl From<&CollectionCheck> for CollectionRow {
    fn from(check: &CollectionCheck) -> Self {
        CollectionRow {
            name: check.name.clone(),
            exists: if check.exists { "yes" } else { "no" }.to_string(),
            documents: check
                .document_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            index: match &check.index {
                IndexCheck::Ready => "ready".to_string(),
                IndexCheck::Missing => "missing".to_string(),
                IndexCheck::Conflict(reason) => format!("CONFLICT: {}", reason),
            },
        }
    }
}

pub async fn run(config: &UgcConfig, args: StatusArgs) -> Result<()> {
    let store = UgcStore::connect(config).await?;
    let checks = store.schema().check().await?;
    let status = summarize(&checks);

    if args.json || args.pretty {
        let result = StoreStatus {
            database: config.db.clone(),
            status,
            collections: checks,
        };
        return super::print_json(&result, args.pretty);
    }

    println!("UGC Store Schema Status");
    println!("=======================\n");
    println!("Database:       {}", config.db);
    println!("Endpoint:       {}", config.redacted_uri());
    println!("Schema:         {}", status);
    println!();

    let rows: Vec<CollectionRow> = checks.iter().map(CollectionRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()).to_string());

    match &status {
        SchemaStatus::Current => {}
        SchemaStatus::NotInitialized | SchemaStatus::Partial { .. } => {
            eprintln!();
            eprintln!("Run `ugc-schema init` to provision the missing pieces.");
        }
        SchemaStatus::Conflict { conflicts } => {
            eprintln!();
            for conflict in conflicts {
                eprintln!("Conflict: {}", conflict);
            }
            eprintln!("Resolve the conflicting indexes before running `ugc-schema init`.");
        }
    }

    Ok(())
}
