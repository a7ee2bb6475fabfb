use std::fs;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use sha2::{Digest, Sha256};

use super::{BlobError, BlobStore, StoredBlob};

const URL_SCHEME: &str = "file://";
const MAX_FILE_NAME_LEN: usize = 120;

/// Blob store rooted at a local directory. Files are named by content hash
/// so re-uploading the same receipt does not duplicate it.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create `root` if needed. The stored root is canonical, so returned
    /// URLs are absolute even when `root` is relative.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = fs::canonicalize(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for_url(&self, url: &str) -> Result<PathBuf, BlobError> {
        let raw = url
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| BlobError::InvalidUrl(url.to_string()))?;
        let path = PathBuf::from(raw);
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir));
        if escapes || !path.starts_with(&self.root) {
            return Err(BlobError::InvalidUrl(url.to_string()));
        }
        Ok(path)
    }
}

impl BlobStore for FsBlobStore {
    fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
        path_hint: &str,
    ) -> Result<StoredBlob, BlobError> {
        if bytes.is_empty() {
            return Err(BlobError::Rejected(format!("{file_name} is empty")));
        }
        let safe_name = sanitize_segment(file_name);
        if safe_name.is_empty() {
            return Err(BlobError::Rejected("file name is empty".into()));
        }

        let mut dir = self.root.clone();
        for segment in path_hint.split('/').filter(|s| !s.is_empty()) {
            // a segment altered by cleaning could alias another hint's directory
            if sanitize_segment(segment) != segment {
                return Err(BlobError::Rejected(format!(
                    "path hint segment '{segment}' is not a plain name"
                )));
            }
            dir.push(segment);
        }
        fs::create_dir_all(&dir)?;

        let digest = Sha256::digest(bytes);
        let hash = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
        let target = dir.join(format!("{hash}-{safe_name}"));

        // write-then-rename keeps a half-written file from ever being visible
        let partial = target.with_extension("partial");
        fs::write(&partial, bytes)?;
        fs::rename(&partial, &target)?;

        tracing::debug!(path = %target.display(), size = bytes.len(), "Blob stored");
        Ok(StoredBlob {
            url: format!("{URL_SCHEME}{}", target.display()),
            file_name: file_name.to_string(),
        })
    }

    fn delete(&self, url: &str) -> Result<(), BlobError> {
        let path = self.path_for_url(url)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(url.to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}

/// Keep only characters that are safe in a single path segment.
fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(MAX_FILE_NAME_LEN)
        .collect();
    cleaned.trim_matches('.').to_string()
}
