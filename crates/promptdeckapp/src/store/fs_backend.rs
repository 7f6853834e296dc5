use super::backend::StorageBackend;
use crate::error::{PromptDeckError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One `<key>.json` file per blob under `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(PromptDeckError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(PromptDeckError::Io)?;
        Ok(Some(content))
    }

    fn write_blob(&self, key: &str, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.blob_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(PromptDeckError::Io)?;
        fs::rename(&tmp, target).map_err(PromptDeckError::Io)?;

        Ok(())
    }

    fn delete_blob(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(PromptDeckError::Io)?;
        }
        Ok(())
    }
}
