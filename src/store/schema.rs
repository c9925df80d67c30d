//! Store schema management
//!
//! This module declares the collections and indexes of the UGC movie store
//! and keeps a live database in line with the declaration. All collections
//! are defined here to ensure consistency between provisioning and checks.

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use serde::Serialize;
use tracing::{debug, info};

/// Declared index on a collection
///
/// All declared fields are indexed in ascending order.
pub struct IndexSpec {
    /// Server-side index name
    pub name: &'static str,
    /// Indexed fields, in key order
    pub fields: &'static [&'static str],
    /// Whether the index enforces uniqueness
    pub unique: bool,
}

/// Declared collection together with its index
pub struct CollectionSpec {
    pub name: &'static str,
    pub index: IndexSpec,
}

/// Schema definitions for all collections in the UGC store
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Collection holding one document per (film, user) like
    pub const LIKED_MOVIES: &'static str = "liked_movies";

    /// Collection holding one document per (film, user) bookmark
    pub const BOOKMARKS_MOVIES: &'static str = "bookmarks_movies";

    /// Collection holding one document per (film, user) review
    pub const REVIEWED_MOVIES: &'static str = "reviewed_movies";

    /// Fields of the uniqueness pair shared by all collections
    pub const PAIR_FIELDS: &'static [&'static str] = &["film_id", "user_id"];

    /// Server-side name of the pair index
    pub const PAIR_INDEX_NAME: &'static str = "film_id_1_user_id_1";

    /// Every collection carries the same unique (film_id, user_id) index
    pub const COLLECTIONS: &'static [CollectionSpec] = &[
        CollectionSpec {
            name: Self::LIKED_MOVIES,
            index: IndexSpec {
                name: Self::PAIR_INDEX_NAME,
                fields: Self::PAIR_FIELDS,
                unique: true,
            },
        },
        CollectionSpec {
            name: Self::BOOKMARKS_MOVIES,
            index: IndexSpec {
                name: Self::PAIR_INDEX_NAME,
                fields: Self::PAIR_FIELDS,
                unique: true,
            },
        },
        CollectionSpec {
            name: Self::REVIEWED_MOVIES,
            index: IndexSpec {
                name: Self::PAIR_INDEX_NAME,
                fields: Self::PAIR_FIELDS,
                unique: true,
            },
        },
    ];
}

impl IndexSpec {
    /// Key document in declaration order, all ascending
    pub fn keys(&self) -> Document {
        let mut keys = Document::new();
        for field in self.fields {
            keys.insert(*field, 1);
        }
        keys
    }

    /// Build the driver model for creating this index
    pub fn model(&self) -> IndexModel {
        let options = IndexOptions::builder()
            .name(self.name.to_string())
            .unique(self.unique)
            .build();
        IndexModel::builder()
            .keys(self.keys())
            .options(options)
            .build()
    }
}

/// Result of checking one declared index against a live collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexCheck {
    /// Declared index present with the declared options
    Ready,
    /// Declared index absent
    Missing,
    /// An existing index clashes with the declaration
    Conflict(String),
}

/// Live state of one declared collection
#[derive(Debug, Clone, Serialize)]
pub struct CollectionCheck {
    pub name: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u64>,
    pub index: IndexCheck,
}

/// Status of the store schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaStatus {
    /// All declared collections and indexes present
    Current,

    /// None of the declared collections exist (fresh database)
    NotInitialized,

    /// Some declared collections or indexes are missing
    Partial {
        missing_collections: Vec<String>,
        missing_indexes: Vec<String>,
    },

    /// Existing indexes clash with the declaration
    Conflict { conflicts: Vec<String> },
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::Current => write!(f, "current"),
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Partial { .. } => write!(f, "partially initialized"),
            SchemaStatus::Conflict { .. } => write!(f, "conflicting indexes present"),
        }
    }
}

/// Outcome of a provisioning pass
#[derive(Debug, Default, Clone, Serialize)]
pub struct EnsureReport {
    pub created_collections: Vec<String>,
    pub created_indexes: Vec<String>,
    pub unchanged: Vec<String>,
}

impl EnsureReport {
    /// True when the pass created nothing
    pub fn is_noop(&self) -> bool {
        self.created_collections.is_empty() && self.created_indexes.is_empty()
    }
}

/// Index key values reduced to (field, direction) pairs
///
/// Key documents read back from a server may carry Int32, Int64, or Double
/// values depending on which driver created the index.
fn normalized_keys(keys: &Document) -> Vec<(String, i64)> {
    keys.iter()
        .map(|(field, value)| {
            let direction = match value {
                Bson::Int32(v) => *v as i64,
                Bson::Int64(v) => *v,
                Bson::Double(v) => *v as i64,
                _ => 0,
            };
            (field.clone(), direction)
        })
        .collect()
}

/// Check one declared index against the indexes listed on a live collection
pub fn check_index(spec: &IndexSpec, existing: &[IndexModel]) -> IndexCheck {
    let declared = normalized_keys(&spec.keys());

    for index in existing {
        let name = index.options.as_ref().and_then(|o| o.name.as_deref());
        if name == Some("_id_") {
            continue;
        }

        if normalized_keys(&index.keys) == declared {
            let unique = index
                .options
                .as_ref()
                .and_then(|o| o.unique)
                .unwrap_or(false);
            if unique != spec.unique {
                return IndexCheck::Conflict(format!(
                    "index {} covers the declared keys but is {}",
                    name.unwrap_or("<unnamed>"),
                    if unique { "unique" } else { "not unique" }
                ));
            }
            if let Some(other) = name {
                if other != spec.name {
                    return IndexCheck::Conflict(format!(
                        "declared keys already indexed under a different name ({})",
                        other
                    ));
                }
            }
            return IndexCheck::Ready;
        }

        if name == Some(spec.name) {
            return IndexCheck::Conflict(format!(
                "index name {} is taken by an index over different keys",
                spec.name
            ));
        }
    }

    IndexCheck::Missing
}

/// Fold per-collection checks into an overall schema status
pub fn summarize(checks: &[CollectionCheck]) -> SchemaStatus {
    let mut conflicts = Vec::new();
    let mut missing_collections = Vec::new();
    let mut missing_indexes = Vec::new();

    for check in checks {
        if let IndexCheck::Conflict(reason) = &check.index {
            conflicts.push(format!("{}: {}", check.name, reason));
        }
        if !check.exists {
            missing_collections.push(check.name.clone());
        } else if check.index == IndexCheck::Missing {
            missing_indexes.push(check.name.clone());
        }
    }

    if !conflicts.is_empty() {
        return SchemaStatus::Conflict { conflicts };
    }

    if !checks.is_empty() && missing_collections.len() == checks.len() {
        return SchemaStatus::NotInitialized;
    }

    if missing_collections.is_empty() && missing_indexes.is_empty() {
        SchemaStatus::Current
    } else {
        SchemaStatus::Partial {
            missing_collections,
            missing_indexes,
        }
    }
}

/// Compute what a provisioning pass would create, without touching the database
///
/// The checks must be free of conflicts and in declaration order, as
/// produced by [`SchemaManager::check`].
pub fn plan(checks: &[CollectionCheck]) -> EnsureReport {
    let mut report = EnsureReport::default();

    for (spec, check) in SchemaDefinitions::COLLECTIONS.iter().zip(checks) {
        if !check.exists {
            report.created_collections.push(spec.name.to_string());
        }
        match &check.index {
            IndexCheck::Ready => report.unchanged.push(spec.name.to_string()),
            IndexCheck::Missing => report
                .created_indexes
                .push(format!("{}.{}", spec.name, spec.index.name)),
            IndexCheck::Conflict(_) => {}
        }
    }

    report
}

/// Schema manager for the UGC store
///
/// Handles schema inspection and idempotent provisioning.
pub struct SchemaManager<'a> {
    db: &'a Database,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given database handle
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Inspect the live database against the declared schema
    pub async fn check(&self) -> Result<Vec<CollectionCheck>> {
        let existing = self
            .db
            .list_collection_names()
            .await
            .map_err(|e| anyhow!("Failed to list collections in {}: {}", self.db.name(), e))?;

        let mut checks = Vec::with_capacity(SchemaDefinitions::COLLECTIONS.len());
        for spec in SchemaDefinitions::COLLECTIONS {
            let exists = existing.iter().any(|name| name == spec.name);

            let (index, document_count) = if exists {
                let coll = self.db.collection::<Document>(spec.name);
                let cursor = coll
                    .list_indexes()
                    .await
                    .map_err(|e| anyhow!("Failed to list indexes on {}: {}", spec.name, e))?;
                let indexes: Vec<IndexModel> = cursor
                    .try_collect()
                    .await
                    .map_err(|e| anyhow!("Failed to read indexes on {}: {}", spec.name, e))?;
                let count = coll
                    .estimated_document_count()
                    .await
                    .map_err(|e| anyhow!("Failed to count documents in {}: {}", spec.name, e))?;

                (check_index(&spec.index, &indexes), Some(count))
            } else {
                (IndexCheck::Missing, None)
            };

            debug!("Inspected collection {} (exists: {})", spec.name, exists);
            checks.push(CollectionCheck {
                name: spec.name.to_string(),
                exists,
                document_count,
                index,
            });
        }

        Ok(checks)
    }

    /// Check the current schema status
    pub async fn status(&self) -> Result<SchemaStatus> {
        Ok(summarize(&self.check().await?))
    }

    /// Ensure the declared collections and indexes exist
    ///
    /// Creates missing collections and indexes, skips whatever already
    /// matches the declaration. Running this against a fully provisioned
    /// database is a no-op. An existing index that clashes with the
    /// declaration is an error, never silently replaced.
    pub async fn ensure(&self) -> Result<EnsureReport> {
        let checks = self.check().await?;

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

        let mut report = EnsureReport::default();
        for (spec, check) in SchemaDefinitions::COLLECTIONS.iter().zip(&checks) {
            if !check.exists {
                self.db
                    .create_collection(spec.name)
                    .await
                    .map_err(|e| anyhow!("Failed to create collection {}: {}", spec.name, e))?;
                info!("Created collection {}", spec.name);
                report.created_collections.push(spec.name.to_string());
            }

            match &check.index {
                IndexCheck::Missing => {
                    let coll = self.db.collection::<Document>(spec.name);
                    let created = coll.create_index(spec.index.model()).await.map_err(|e| {
                        anyhow!(
                            "Failed to create index {} on {}: {}",
                            spec.index.name,
                            spec.name,
                            e
                        )
                    })?;
                    info!(
                        "Created unique index {} on {}",
                        created.index_name, spec.name
                    );
                    report
                        .created_indexes
                        .push(format!("{}.{}", spec.name, created.index_name));
                }
                IndexCheck::Ready => {
                    report.unchanged.push(spec.name.to_string());
                }
                IndexCheck::Conflict(_) => {}
            }
        }

        Ok(report)
    }

    /// Drop the declared collections and their indexes
    ///
    /// Collections outside the declaration are left untouched.
    pub async fn reset(&self) -> Result<()> {
        let existing = self
            .db
            .list_collection_names()
            .await
            .map_err(|e| anyhow!("Failed to list collections in {}: {}", self.db.name(), e))?;

        for spec in SchemaDefinitions::COLLECTIONS {
            if existing.iter().any(|name| name == spec.name) {
                self.db
                    .collection::<Document>(spec.name)
                    .drop()
                    .await
                    .map_err(|e| anyhow!("Failed to drop collection {}: {}", spec.name, e))?;
                info!("Dropped collection {}", spec.name);
            }
        }

        Ok(())
    }
}
