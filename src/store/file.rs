//! File-backed gateway: one file per key under a data directory

use super::{PersistenceGateway, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    /// Create a gateway rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        // Write beside the target then rename so readers never see half a file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn gateway() -> (TempDir, FileGateway) {
        let dir = TempDir::new().unwrap();
        let gateway = FileGateway::new(dir.path().join("data"));
        (dir, gateway)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (_dir, gateway) = gateway();
        assert_eq!(gateway.get("form.nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let (_dir, gateway) = gateway();
        gateway.set("form.list", "[\"a\"]").await.unwrap();
        assert_eq!(
            gateway.get("form.list").await.unwrap().as_deref(),
            Some("[\"a\"]")
        );

        gateway.set("form.list", "[]").await.unwrap();
        assert_eq!(gateway.get("form.list").await.unwrap().as_deref(), Some("[]"));

        gateway.remove("form.list").await.unwrap();
        assert_eq!(gateway.get("form.list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let (_dir, gateway) = gateway();
        assert!(gateway.remove("never-written").await.is_ok());
    }

    #[test]
    fn test_key_sanitising() {
        let gateway = FileGateway::new("/data");
        assert_eq!(
            gateway.path_for("form.ab-12_x"),
            PathBuf::from("/data/form.ab-12_x.json")
        );
        assert_eq!(
            gateway.path_for("../etc/passwd"),
            PathBuf::from("/data/.._etc_passwd.json")
        );
    }

    #[tokio::test]
    async fn test_creates_root_on_first_write() {
        let (_dir, gateway) = gateway();
        assert!(!gateway.root().exists());
        gateway.set("k", "v").await.unwrap();
        assert!(gateway.root().is_dir());
        assert!(!gateway.root().join("k.json.tmp").exists());
    }
}
