use std::path::PathBuf;

use tracing::info;

use crate::error::StoreError;
use crate::utils::{load_text, remove_file, save_text};

/// Clave compartida del portal de abogados, guardada en disco sin vencimiento
#[derive(Debug, Clone)]
pub struct LawyerKeyStore {
    path: PathBuf,
}

impl LawyerKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<String>, StoreError> {
        load_text(&self.path)
    }

    /// Guarda la clave recortada. Una clave vacía no se guarda.
    pub fn save(&self, key: &str) -> Result<bool, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        save_text(&self.path, key)?;
        info!("clave de abogado guardada");
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        remove_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_trimmed_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LawyerKeyStore::new(dir.path().join("lawyer_key"));

        assert_eq!(store.load().unwrap(), None);
        assert!(store.save("  s3cret \n").unwrap());
        assert_eq!(store.load().unwrap().as_deref(), Some("s3cret"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LawyerKeyStore::new(dir.path().join("lawyer_key"));

        assert!(!store.save("   ").unwrap());
        assert_eq!(store.load().unwrap(), None);
    }
}
