use super::backend::StorageBackend;
use crate::error::{PromptDeckError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since promptdeck is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `StorageBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    blobs: RefCell<HashMap<String, String>>,
    simulate_read_error: RefCell<bool>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a blob, bypassing write error simulation.
    pub fn with_blob(self, key: &str, content: &str) -> Self {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
        self
    }

    /// Enable read error simulation for testing degraded loads.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Raw blob contents, for assertions.
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        if *self.simulate_read_error.borrow() {
            return Err(PromptDeckError::Store("Simulated read error".to_string()));
        }
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write_blob(&self, key: &str, content: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(PromptDeckError::Store("Simulated write error".to_string()));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> Result<()> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let backend = MemBackend::new();
        assert!(backend.read_blob("k").unwrap().is_none());
        backend.write_blob("k", "[]").unwrap();
        assert_eq!(backend.read_blob("k").unwrap().as_deref(), Some("[]"));
        backend.delete_blob("k").unwrap();
        assert!(backend.read_blob("k").unwrap().is_none());
    }

    #[test]
    fn simulated_errors() {
        let backend = MemBackend::new().with_blob("k", "[]");
        backend.set_simulate_write_error(true);
        assert!(backend.write_blob("k", "[1]").is_err());
        assert_eq!(backend.blob("k").as_deref(), Some("[]"));

        backend.set_simulate_read_error(true);
        assert!(backend.read_blob("k").is_err());
    }
}
