//! Flat directory store for face data submissions.
//!
//! Each submission is two sibling files sharing one timestamp:
//! `face_data_<ts>.json` and `screenshot_<ts>.png`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use facetrack_models::{Timestamp, ValidSubmission};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::data_url::decode_data_url;
use crate::error::{Artifact, StorageError, StorageResult};

/// Prefix of in-flight temp files. They never show up in listings.
const TEMP_PREFIX: &str = ".tmp-";

/// What to do with an existing storage directory at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// Create the directory if missing, keep whatever is inside.
    #[default]
    Preserve,
    /// Create the directory if missing, otherwise delete every file in it.
    Wipe,
}

/// Outcome of [`FaceDataStore::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitReport {
    /// The directory did not exist and was created
    pub created: bool,
    /// Files removed by [`InitMode::Wipe`]
    pub removed: usize,
}

/// File-backed face data store.
#[derive(Debug, Clone)]
pub struct FaceDataStore {
    dir: PathBuf,
}

impl FaceDataStore {
    /// Create a store rooted at `dir`. Nothing touches the disk until
    /// [`init`](Self::init) or the first operation.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, ts: &Timestamp) -> PathBuf {
        self.dir.join(ts.record_file_name())
    }

    pub fn screenshot_path(&self, ts: &Timestamp) -> PathBuf {
        self.dir.join(ts.screenshot_file_name())
    }

    /// Prepare the storage directory.
    ///
    /// Must be called deliberately by the owner of the store; with
    /// [`InitMode::Wipe`] all previously stored submissions are lost.
    pub async fn init(&self, mode: InitMode) -> StorageResult<InitReport> {
        let mut report = InitReport::default();

        if !fs::try_exists(&self.dir).await? {
            fs::create_dir_all(&self.dir).await?;
            report.created = true;
            info!(dir = %self.dir.display(), "Created face data directory");
            return Ok(report);
        }

        if mode == InitMode::Wipe {
            let mut entries = fs::read_dir(&self.dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                fs::remove_file(entry.path()).await?;
                report.removed += 1;
            }
            warn!(
                dir = %self.dir.display(),
                removed = report.removed,
                "Wiped face data directory"
            );
        }

        Ok(report)
    }

    /// Write a full submission: the record first, then the screenshot.
    ///
    /// The screenshot is decoded before anything is written, so a bad data
    /// URL leaves the directory untouched. A failed screenshot write does not
    /// roll back the record.
    pub async fn save(&self, ts: &Timestamp, submission: &ValidSubmission) -> StorageResult<()> {
        let png = decode_data_url(&submission.screenshot)?;

        self.save_record(ts, &submission.face_data).await?;
        self.write_screenshot(ts, &png).await?;

        debug!(timestamp = %ts, bytes = png.len(), "Saved face data submission");
        Ok(())
    }

    /// Write the JSON record for `ts`, replacing any previous one.
    pub async fn save_record(&self, ts: &Timestamp, face_data: &Value) -> StorageResult<()> {
        let json = serde_json::to_vec(face_data)?;
        let path = self.record_path(ts);

        write_atomic(&path, &json).await.map_err(|e| {
            error!(path = %path.display(), "Error writing face data: {}", e);
            StorageError::write_failed(Artifact::Record, e)
        })
    }

    /// Decode a data URL and write it as the screenshot for `ts`.
    pub async fn save_screenshot(&self, ts: &Timestamp, data_url: &str) -> StorageResult<()> {
        let png = decode_data_url(data_url)?;
        self.write_screenshot(ts, &png).await
    }

    async fn write_screenshot(&self, ts: &Timestamp, png: &[u8]) -> StorageResult<()> {
        let path = self.screenshot_path(ts);

        write_atomic(&path, png).await.map_err(|e| {
            error!(path = %path.display(), "Error saving screenshot: {}", e);
            StorageError::write_failed(Artifact::Screenshot, e)
        })
    }

    /// List every file name in the directory, sorted.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            error!(dir = %self.dir.display(), "Error reading directory: {}", e);
            StorageError::ListFailed(e)
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::ListFailed)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(TEMP_PREFIX) {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    /// Read and parse the JSON record for `ts`.
    pub async fn get(&self, ts: &Timestamp) -> StorageResult<Value> {
        let path = self.record_path(ts);

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::not_found(ts.record_file_name()));
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(serde_json::from_slice(&data)?)
    }

    /// Whether a record exists for `ts`.
    pub async fn exists(&self, ts: &Timestamp) -> StorageResult<bool> {
        Ok(fs::try_exists(self.record_path(ts)).await?)
    }

    /// Remove both files for `ts`: the record first, then the screenshot.
    ///
    /// Files that are already gone count as deleted.
    pub async fn delete(&self, ts: &Timestamp) -> StorageResult<()> {
        remove_if_present(&self.record_path(ts))
            .await
            .map_err(|e| {
                error!(timestamp = %ts, "Error deleting face data: {}", e);
                StorageError::delete_failed(Artifact::Record, e)
            })?;

        remove_if_present(&self.screenshot_path(ts))
            .await
            .map_err(|e| {
                error!(timestamp = %ts, "Error deleting screenshot: {}", e);
                StorageError::delete_failed(Artifact::Screenshot, e)
            })?;

        debug!(timestamp = %ts, "Deleted face data submission");
        Ok(())
    }

    /// Check that the directory exists and can be listed.
    pub async fn check_readable(&self) -> StorageResult<()> {
        let mut entries = fs::read_dir(&self.dir).await?;
        entries.next_entry().await?;
        Ok(())
    }
}

/// Write to a temp file next to `path`, then rename over it.
async fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Unique per write so concurrent writers never share a temp file
    let tmp = path.with_file_name(format!("{}{}-{}", TEMP_PREFIX, Uuid::new_v4(), file_name));

    fs::write(&tmp, contents).await?;

    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }

    Ok(())
}

async fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
