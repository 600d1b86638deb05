use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Writes relative paths under `base_path`; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("debug/traefik-config.json", b"{}")
            .await
            .unwrap();

        assert!(temp_dir.path().join("debug/traefik-config.json").exists());
        assert_eq!(
            fs::read(temp_dir.path().join("debug/traefik-config.json")).unwrap(),
            b"{}"
        );
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("raw.json");
        let storage = LocalStorage::new("/nonexistent-base".to_string());

        storage
            .write_file(target.to_str().unwrap(), b"raw")
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"raw");
    }
}
