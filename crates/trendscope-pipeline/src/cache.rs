//! Keyed result cache: one entry per business, last writer wins.
//!
//! Entries are keyed by business id so one tenant's results can never
//! be served to another. The file-backed store writes one JSON document
//! per business under the configured cache directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use trendscope_core::PipelineResult;

use crate::error::PipelineError;

/// The three operations the pipeline needs from a result store.
#[async_trait]
pub trait TrendCache: Send + Sync {
    async fn load(&self, business_id: &str) -> Result<Option<PipelineResult>, PipelineError>;
    async fn save(&self, business_id: &str, result: &PipelineResult) -> Result<(), PipelineError>;
    async fn clear(&self, business_id: &str) -> Result<(), PipelineError>;
}

/// One JSON file per business id under a cache directory.
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileCache { dir: dir.into() }
    }

    fn entry_path(&self, business_id: &str) -> PathBuf {
        // Business ids come from caller input; keep only filename-safe
        // characters so an id cannot escape the cache directory.
        let safe: String = business_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn io_err(business_id: &str, source: std::io::Error) -> PipelineError {
        PipelineError::CacheIo {
            business_id: business_id.to_string(),
            source,
        }
    }
}

#[async_trait]
impl TrendCache for JsonFileCache {
    async fn load(&self, business_id: &str) -> Result<Option<PipelineResult>, PipelineError> {
        let path = self.entry_path(business_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let result = serde_json::from_slice(&bytes)?;
                Ok(Some(result))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_err(business_id, err)),
        }
    }

    async fn save(&self, business_id: &str, result: &PipelineResult) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| Self::io_err(business_id, err))?;
        let path = self.entry_path(business_id);
        let bytes = serde_json::to_vec_pretty(result)?;
        // Write-then-rename so a crash mid-write never leaves a torn
        // entry behind.
        let tmp = tmp_path(&path);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|err| Self::io_err(business_id, err))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|err| Self::io_err(business_id, err))?;
        tracing::debug!(business_id, path = %path.display(), "cached pipeline result");
        Ok(())
    }

    async fn clear(&self, business_id: &str) -> Result<(), PipelineError> {
        let path = self.entry_path(business_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_err(business_id, err)),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// In-memory store for tests and embedders that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryCache {
    entries: tokio::sync::Mutex<std::collections::HashMap<String, PipelineResult>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        MemoryCache::default()
    }
}

#[async_trait]
impl TrendCache for MemoryCache {
    async fn load(&self, business_id: &str) -> Result<Option<PipelineResult>, PipelineError> {
        Ok(self.entries.lock().await.get(business_id).cloned())
    }

    async fn save(&self, business_id: &str, result: &PipelineResult) -> Result<(), PipelineError> {
        self.entries
            .lock()
            .await
            .insert(business_id.to_string(), result.clone());
        Ok(())
    }

    async fn clear(&self, business_id: &str) -> Result<(), PipelineError> {
        self.entries.lock().await.remove(business_id);
        Ok(())
    }
}
