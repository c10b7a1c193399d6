use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use super::RecordStore;
use super::models::{Form, Settings, SettingsPatch, Snapshot};
use crate::error::StoreError;

/// On-disk layout. `sessions` and `attendance` are reserved and carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbDocument {
    pub forms: Vec<Form>,
    pub settings: Settings,
    pub sessions: Vec<Value>,
    pub attendance: Vec<Value>,
}

/// Whole-file JSON store.
///
/// There is no cross-process locking; two processes writing the same file
/// race and the last rename wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    seed: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf, seed: Option<PathBuf>) -> Self {
        Self { path, seed }
    }

    async fn read_document(path: &Path) -> Result<DbDocument, StoreError> {
        let raw = fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Primary file, else the seed file (copied into place), else the default document.
    async fn load_document(&self) -> DbDocument {
        match Self::read_document(&self.path).await {
            Ok(doc) => return doc,
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file yet");
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file unreadable; falling back"
                );
            }
        }

        if let Some(seed) = self.seed.as_deref() {
            match Self::read_document(seed).await {
                Ok(doc) => {
                    info!(
                        seed = %seed.display(),
                        path = %self.path.display(),
                        "seeding store from file"
                    );
                    if let Err(e) = self.write_document(&doc).await {
                        warn!(
                            path = %self.path.display(),
                            error = %e,
                            "failed to copy seed into store"
                        );
                    }
                    return doc;
                }
                Err(e) => {
                    warn!(seed = %seed.display(), error = %e, "seed file unreadable");
                }
            }
        }

        DbDocument::default()
    }

    async fn write_document(&self, doc: &DbDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(doc)?;

        // Write beside the target and rename so readers never see a half-written file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load_all(&self) -> Snapshot {
        let doc = self.load_document().await;
        let mut snapshot = Snapshot {
            forms: doc.forms,
            settings: doc.settings,
        };
        snapshot
            .forms
            .sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        snapshot
    }

    async fn replace_all(&self, forms: &[Form], settings: &Settings) -> Result<(), StoreError> {
        let mut doc = self.load_document().await;
        doc.forms = forms.to_vec();
        doc.settings = *settings;
        self.write_document(&doc).await
    }

    async fn upsert_settings(&self, patch: &SettingsPatch) -> Result<(), StoreError> {
        let mut doc = self.load_document().await;
        patch.apply(&mut doc.settings);
        self.write_document(&doc).await
    }
}
