//! File store over a single flat storage root.
//!
//! The filesystem is the only source of truth: nothing is cached, every
//! listing and delete goes back to the directory.

use std::io;
use std::path::{Path, PathBuf};

use futures::stream::{self, Stream};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::name::{derive_stored_name, disambiguator, is_listable, validate_name};
use crate::{GatewayError, Result};

/// File store rooted at one directory.
///
/// ```text
/// {root}/
/// ├── my-report-3fa9c1.PDF
/// ├── photo-0b72de.jpg
/// └── .upload-5e01a2c4d9f7.part   (in-flight upload, hidden)
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new FileStore over the given root.
    ///
    /// The root directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Get the storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied name to a path directly under the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_name(name)?))
    }

    /// Start writing an uploaded file.
    ///
    /// Content goes to a hidden staging file until [`PendingUpload::commit`]
    /// renames it to its stored name.
    pub async fn begin_upload(&self, original_name: &str) -> Result<PendingUpload> {
        let stored_name = derive_stored_name(original_name);
        let staging_path = self
            .root
            .join(format!(".upload-{}{}.part", disambiguator(), disambiguator()));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging_path)
            .await?;

        Ok(PendingUpload {
            file: Some(file),
            final_path: self.root.join(&stored_name),
            staging_path,
            stored_name,
            committed: false,
        })
    }

    /// Save a complete file in one call and return its stored name.
    #[cfg(test)]
    pub async fn save(&self, original_name: &str, content: &[u8]) -> Result<String> {
        let mut upload = self.begin_upload(original_name).await?;
        upload.write_chunk(content).await?;
        upload.commit().await
    }

    /// List visible entries of the storage root.
    ///
    /// Opening the directory fails eagerly. The returned stream yields names
    /// in enumeration order, skipping hidden entries and the recovery
    /// directory; after an enumeration error it yields that error and ends.
    pub async fn list(&self) -> Result<impl Stream<Item = Result<String>> + Send + 'static> {
        let entries = fs::read_dir(&self.root).await?;

        Ok(stream::unfold(Some(entries), |state| async move {
            let mut entries = state?;
            loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => {
                        let name = entry.file_name().to_string_lossy().into_owned();
                        if is_listable(&name) {
                            return Some((Ok(name), Some(entries)));
                        }
                    }
                    Ok(None) => return None,
                    Err(e) => return Some((Err(GatewayError::Io(e)), None)),
                }
            }
        }))
    }

    /// Delete a stored file by name.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(GatewayError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// An upload being written to its staging file.
///
/// Dropping it without a successful commit removes the staging file, so an
/// aborted or failed part never shows up under a stored name.
#[derive(Debug)]
pub struct PendingUpload {
    file: Option<File>,
    staging_path: PathBuf,
    final_path: PathBuf,
    stored_name: String,
    committed: bool,
}

impl PendingUpload {
    /// The name the file will be stored under.
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    /// Append a chunk of content.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let file = self.file.as_mut().ok_or_else(closed_upload)?;
        file.write_all(chunk).await?;
        Ok(())
    }

    /// Finish the upload and move it to its stored name.
    pub async fn commit(mut self) -> Result<String> {
        let mut file = self.file.take().ok_or_else(closed_upload)?;
        file.flush().await?;
        drop(file);

        fs::rename(&self.staging_path, &self.final_path).await?;
        self.committed = true;

        Ok(std::mem::take(&mut self.stored_name))
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        // Drop cannot await; a single unlink is short enough to run inline.
        if let Err(e) = std::fs::remove_file(&self.staging_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.staging_path.display(),
                    error = %e,
                    "Failed to remove upload staging file"
                );
            }
        }
    }
}

fn closed_upload() -> GatewayError {
    GatewayError::Io(io::Error::new(
        io::ErrorKind::BrokenPipe,
        "upload already closed",
    ))
}
