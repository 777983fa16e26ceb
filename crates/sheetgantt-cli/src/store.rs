//! Blob store for the current spreadsheet
//!
//! The store holds exactly one document. `put` replaces it and `get`
//! returns a URL the document can be downloaded from.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no document has been uploaded to {0}")]
    NotFound(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait BlobStore {
    /// Replace the stored document
    fn put(&self, bytes: &[u8]) -> Result<(), StoreError>;

    /// Download URL for the stored document
    fn get(&self) -> Result<String, StoreError>;
}

/// Directory-backed store
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    file_name: String,
}

impl LocalBlobStore {
    pub const DEFAULT_FILE_NAME: &'static str = "current.csv";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: Self::DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Store under a different file name, e.g. to keep a `.json` extension
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let target = self.document_path();
        // Write beside the target then rename, so readers never see half a file
        let staging = self.root.join(format!(".{}.partial", self.file_name));
        std::fs::write(&staging, bytes)?;
        std::fs::rename(&staging, &target)?;
        info!(path = %target.display(), bytes = bytes.len(), "stored document");
        Ok(())
    }

    fn get(&self) -> Result<String, StoreError> {
        let path = self.document_path();
        if !path.is_file() {
            return Err(StoreError::NotFound(self.root.display().to_string()));
        }
        let absolute = path.canonicalize()?;
        Ok(format!("file://{}", absolute.display()))
    }
}
