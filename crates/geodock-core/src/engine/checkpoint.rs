use super::error::ModelLoadError;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A docking-model checkpoint whose file has been checked to be loadable.
///
/// The format itself is opaque here; the backend interprets the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    path: PathBuf,
    size_bytes: u64,
}

impl Checkpoint {
    pub fn open(path: &Path) -> Result<Self, ModelLoadError> {
        let invalid = |reason: String| ModelLoadError::InvalidCheckpoint {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            return Err(ModelLoadError::CheckpointNotFound(path.to_path_buf()));
        }
        let metadata = path.metadata().map_err(|e| invalid(e.to_string()))?;
        if !metadata.is_file() {
            return Err(invalid("not a regular file".to_string()));
        }
        if metadata.len() == 0 {
            return Err(invalid("file is empty".to_string()));
        }
        File::open(path).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}
