use super::fs_backend::FsBackend;
use super::template_store::TemplateStore;
use std::path::PathBuf;

pub type FileStore = TemplateStore<FsBackend>;

impl FileStore {
    /// A store persisting under `root`, which is created on first write.
    pub fn open(root: PathBuf) -> Self {
        TemplateStore::with_backend(FsBackend::new(root))
    }
}
