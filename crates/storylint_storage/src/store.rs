//! Filesystem artifact store for one run.

use crate::key::check_component;
use crate::{ArtifactDir, ArtifactKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use storylint_error::{JsonError, StorageError, StorageErrorKind, StorylintResult};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// A timestamp run identifier such as `20250114-093512`.
pub fn new_run_id() -> String {
    chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string()
}

/// The most recent run under `runs_dir`, by identifier order.
///
/// # Errors
///
/// Returns a storage error if the directory exists but cannot be listed.
pub async fn latest_run_id(runs_dir: impl AsRef<Path>) -> StorylintResult<Option<String>> {
    let runs_dir = runs_dir.as_ref();
    if !tokio::fs::try_exists(runs_dir).await.unwrap_or(false) {
        return Ok(None);
    }
    let mut entries = tokio::fs::read_dir(runs_dir).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            runs_dir.display(),
            e
        )))
    })?;

    let mut latest: Option<String> = None;
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            runs_dir.display(),
            e
        )))
    })? {
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        let name = entry.file_name().to_string_lossy().to_string();
        if is_dir && !name.starts_with('.') && latest.as_ref().is_none_or(|l| name > *l) {
            latest = Some(name);
        }
    }
    Ok(latest)
}

/// Artifact store rooted at `<runs_dir>/<run_id>`.
///
/// The run directory is created once and only added to afterwards; existing
/// artifacts change only when a caller overwrites them explicitly.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    run_id: String,
    run_dir: PathBuf,
}

impl ArtifactStore {
    /// Open (creating if needed) the run directory and its stage folders.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the run id is not a plain name or a
    /// directory cannot be created.
    #[instrument(skip(runs_dir), fields(runs_dir = %runs_dir.as_ref().display()))]
    pub async fn open(runs_dir: impl AsRef<Path>, run_id: &str) -> StorylintResult<Self> {
        let run_dir = runs_dir.as_ref().join(check_component(run_id)?);
        for dir in ArtifactDir::iter() {
            let path = run_dir.join(dir.as_ref());
            tokio::fs::create_dir_all(&path).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
        }
        info!(path = %run_dir.display(), "Opened run directory");
        Ok(Self {
            run_id: run_id.to_string(),
            run_dir,
        })
    }

    /// Open a run that must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the run directory is absent.
    pub async fn open_existing(runs_dir: impl AsRef<Path>, run_id: &str) -> StorylintResult<Self> {
        let run_dir = runs_dir.as_ref().join(check_component(run_id)?);
        if !tokio::fs::try_exists(&run_dir).await.unwrap_or(false) {
            return Err(StorageError::new(StorageErrorKind::NotFound(
                run_dir.display().to_string(),
            ))
            .into());
        }
        Self::open(runs_dir, run_id).await
    }

    /// Run identifier.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Run directory.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Absolute path of a key's JSON artifact.
    pub fn json_path(&self, key: &ArtifactKey) -> StorylintResult<PathBuf> {
        Ok(self.run_dir.join(key.json_path()?))
    }

    /// Whether the key's JSON artifact exists.
    pub async fn exists(&self, key: &ArtifactKey) -> bool {
        match self.json_path(key) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Serialize `value` as pretty JSON and write it atomically.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if serialization fails or a storage error if the
    /// write or rename fails.
    #[instrument(skip(self, value), fields(artifact = %key.identity()))]
    pub async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &ArtifactKey,
        value: &T,
    ) -> StorylintResult<PathBuf> {
        let mut bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| JsonError::new(format!("Failed to serialize {}: {}", key.identity(), e)))?;
        bytes.push(b'\n');
        let path = self.json_path(key)?;
        write_atomic(&path, &bytes).await?;
        Ok(path)
    }

    /// Write the rendered markdown beside a key's JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] for keys without a markdown
    /// form, or a storage error if the write fails.
    #[instrument(skip(self, text), fields(artifact = %key.identity()))]
    pub async fn write_markdown(&self, key: &ArtifactKey, text: &str) -> StorylintResult<PathBuf> {
        let relative = key.markdown_path()?.ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidPath(format!(
                "{} has no markdown form",
                key.identity()
            )))
        })?;
        let path = self.run_dir.join(relative);
        write_atomic(&path, text.as_bytes()).await?;
        Ok(path)
    }

    /// Read and decode a key's JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if the artifact is absent, a
    /// storage error if it cannot be read, or a JSON error if it does not
    /// decode as `T`.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &ArtifactKey) -> StorylintResult<T> {
        let path = self.json_path(key)?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            JsonError::new(format!("Failed to decode {}: {}", path.display(), e)).into()
        })
    }

    /// Report JSON files present in a stage folder, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the folder cannot be listed.
    pub async fn list_reports(&self, dir: ArtifactDir) -> StorylintResult<Vec<PathBuf>> {
        let folder = self.run_dir.join(dir.as_ref());
        let mut entries = match tokio::fs::read_dir(&folder).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    folder.display(),
                    e
                )))
                .into());
            }
        };

        let mut reports = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                folder.display(),
                e
            )))
        })? {
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".report.json"))
            {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }
}

/// Write to a uniquely named sibling, then rename over the target.
async fn write_atomic(path: &Path, bytes: &[u8]) -> StorylintResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    if let Err(e) = tokio::fs::write(&temp_path, bytes).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
        .into());
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
        .into());
    }

    debug!(path = %path.display(), size = bytes.len(), "Wrote artifact");
    Ok(())
}
