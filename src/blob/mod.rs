//! Receipt storage. The ledger only needs upload and delete.

mod fs;

pub use fs::FsBlobStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid blob URL: {0}")]
    InvalidUrl(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// Location of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub url: String,
    pub file_name: String,
}

pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a location derived from `path_hint`.
    fn upload(&self, bytes: &[u8], file_name: &str, path_hint: &str)
        -> Result<StoredBlob, BlobError>;

    /// Remove a previously uploaded blob by URL.
    fn delete(&self, url: &str) -> Result<(), BlobError>;
}
