#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! ugc-schema - MongoDB schema provisioning for the UGC movie store
//!
//! ugc-schema keeps the `ugc2_movies` database in the shape the UGC
//! services expect: three collections (`liked_movies`, `bookmarks_movies`,
//! `reviewed_movies`), each carrying a unique compound index over
//! (`film_id`, `user_id`). It can be used as both a command-line
//! application and a library.
//!
//! Provisioning is idempotent: collections and indexes that already match
//! the declaration are left alone, and a second run against a provisioned
//! database creates nothing. Indexes that clash with the declaration are
//! reported as errors, never silently replaced.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `cli` | Full CLI binary (default) | `clap`, `tabled`, `tokio` |
//!
//! ```toml
//! # Library only - schema types and provisioning
//! ugc-schema = { version = "0.2", default-features = false }
//!
//! # Default (CLI binary)
//! ugc-schema = "0.2"
//! ```
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - **[`store`]**: All MongoDB functionality
//!   - `connection`: client setup and reachability checks
//!   - `schema`: declared collections/indexes and their provisioning
//!
//! - **[`config`]**: Configuration management
//!
//! # Quick Start Examples
//!
//! ## Provisioning the schema
//!
//! ```rust,ignore
//! use ugc_schema::{UgcConfig, UgcStore};
//!
//! // Load config from ~/.ugc-schema/ugc-schema.toml and MONGO_* env vars
//! let config = UgcConfig::new(&None)?;
//!
//! // Connect and ping; unreachable deployments fail here
//! let store = UgcStore::connect(&config).await?;
//!
//! let report = store.schema().ensure().await?;
//! if report.is_noop() {
//!     println!("schema already provisioned");
//! } else {
//!     println!("created collections: {:?}", report.created_collections);
//! }
//! ```
//!
//! ## Checking the schema status
//!
//! ```rust,ignore
//! use ugc_schema::{SchemaStatus, UgcConfig, UgcStore};
//!
//! let config = UgcConfig::new(&None)?;
//! let store = UgcStore::connect(&config).await?;
//!
//! match store.schema().status().await? {
//!     SchemaStatus::Current => println!("all collections and indexes present"),
//!     status => println!("schema is {}", status),
//! }
//! ```

pub mod config;
pub mod store;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::UgcConfig;

// =============================================================================
// Store Module - Re-export commonly used types (always available)
// =============================================================================

// Primary store type
pub use store::UgcStore;

// Connection and schema types
pub use store::{
    check_index, plan, summarize, CollectionCheck, CollectionSpec, EnsureReport, IndexCheck,
    IndexSpec, SchemaDefinitions, SchemaManager, SchemaStatus, StoreConn,
};
