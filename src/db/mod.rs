//! Record store: durable home of the forms list and the settings singleton.
//!
//! Layout:
//! - `models.rs`: forms, settings and the row types backing them
//! - `file.rs`: single JSON document on disk
//! - `schema.rs` / `sqlite.rs`: document collections stored in SQLite
//!
//! Both backends implement [`RecordStore`]; callers hold an
//! `Arc<dyn RecordStore>` and never know which one is behind it.

pub mod file;
pub mod models;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::StoreError;

pub use file::JsonFileStore;
pub use models::{Form, FormId, Settings, SettingsPatch, Snapshot};
pub use sqlite::SqliteStore;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every form plus settings. Read failures fall back to an empty default snapshot.
    async fn load_all(&self) -> Snapshot;

    /// Overwrite forms and settings in one step.
    async fn replace_all(&self, forms: &[Form], settings: &Settings) -> Result<(), StoreError>;

    /// Merge `patch` into the settings record, creating it with defaults if absent.
    async fn upsert_settings(&self, patch: &SettingsPatch) -> Result<(), StoreError>;

    async fn close(&self) {}
}

/// Pick the backend for this deployment: a document database when
/// `database_url` is set, the JSON file otherwise.
pub async fn open(cfg: &Config) -> Result<Arc<dyn RecordStore>, StoreError> {
    match cfg.database_url.as_deref() {
        Some(url) => {
            let store = SqliteStore::connect(url).await?;
            info!(database_url = %url, "using document store backend");
            Ok(Arc::new(store))
        }
        None => {
            info!(path = %cfg.data_path.display(), "using JSON file store backend");
            Ok(Arc::new(JsonFileStore::new(
                cfg.data_path.clone(),
                cfg.seed_path.clone(),
            )))
        }
    }
}
