//! JSON file opportunity store
//!
//! The whole collection lives in memory and is rewritten to disk after
//! every mutation (write to a sibling temp file, then rename).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ArbitrageError, Result};
use crate::store::traits::{validate_for_save, OpportunityStore};
use crate::types::{ArbitrageOpportunity, SavedOpportunity};

/// File-backed store holding a JSON array of saved opportunities
#[derive(Debug)]
pub struct JsonFileOpportunityStore {
    path: PathBuf,
    records: Mutex<Vec<SavedOpportunity>>,
}

impl JsonFileOpportunityStore {
    /// Open the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store; it is created on first save.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<SavedOpportunity>>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), records = records.len(), "Opened opportunity store");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[SavedOpportunity]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), records = records.len(), "Persisted opportunity store");
        Ok(())
    }
}

#[async_trait]
impl OpportunityStore for JsonFileOpportunityStore {
    async fn save(&self, opportunity: ArbitrageOpportunity) -> Result<SavedOpportunity> {
        validate_for_save(&opportunity)?;
        let saved = SavedOpportunity::new(opportunity);

        let mut records = self.records.lock().await;
        records.push(saved.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedOpportunity>> {
        Ok(self.records.lock().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<SavedOpportunity>> {
        Ok(self.records.lock().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(ArbitrageError::NotFound(id))?;

        let removed = records.remove(index);
        if let Err(e) = self.persist(&records).await {
            records.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.lock().await.len())
    }
}
