//! UGC store access
//!
//! This module provides the entry point to the MongoDB deployment backing
//! the UGC movie store:
//! - `connection`: client setup and reachability checks
//! - `schema`: declared collections/indexes and their provisioning

mod connection;
mod schema;

pub use connection::StoreConn;
pub use schema::{
    check_index, plan, summarize, CollectionCheck, CollectionSpec, EnsureReport, IndexCheck,
    IndexSpec, SchemaDefinitions, SchemaManager, SchemaStatus,
};

use anyhow::Result;
use mongodb::Database;
use tracing::info;

use crate::UgcConfig;

/// Main handle to the UGC movie store
///
/// `UgcStore` wraps a verified connection to the configured deployment.
/// Connecting fails fast when the deployment is unreachable, so every
/// schema operation afterwards runs against a live server.
pub struct UgcStore {
    conn: StoreConn,
}

impl UgcStore {
    /// Connect to the configured deployment and verify it is reachable
    pub async fn connect(config: &UgcConfig) -> Result<Self> {
        let conn = StoreConn::open(config).await?;
        conn.ping().await?;
        info!("Connected to MongoDB at {}", conn.endpoint());
        Ok(Self { conn })
    }

    /// Get the handle of the configured database
    pub fn database(&self) -> &Database {
        &self.conn.db
    }

    /// Get a schema manager bound to this store's database
    pub fn schema(&self) -> SchemaManager<'_> {
        SchemaManager::new(&self.conn.db)
    }

    /// Get the server version reported by buildInfo
    pub async fn server_version(&self) -> Result<String> {
        self.conn.server_version().await
    }
}
