use crate::error::Result;

/// Abstract interface for raw blob I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while TemplateStore handles the "what" (collection, bootstrap, index).
///
/// A blob is a whole JSON document addressed by a fixed key. There is no
/// partial update: writers always replace the entire blob.
pub trait StorageBackend {
    /// Read the blob stored under `key`.
    /// Returns Ok(None) if nothing was ever written there.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_blob(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_blob(&self, key: &str, content: &str) -> Result<()>;

    /// Delete the blob. Deleting a missing blob is not an error.
    fn delete_blob(&self, key: &str) -> Result<()>;
}
