use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// 本地暫存目錄，報表上傳前先寫在這裡
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_staging_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("output"));

        storage.write_file("Pune.csv", b"Date: 21-10-2026\r\n").await.unwrap();

        let data = storage.read_file("Pune.csv").await.unwrap();
        assert_eq!(data, b"Date: 21-10-2026\r\n");
        assert!(temp_dir.path().join("output").join("Pune.csv").exists());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = storage.read_file("missing.csv").await;
        assert!(matches!(
            result,
            Err(crate::utils::error::NotifierError::IoError(_))
        ));
    }
}
