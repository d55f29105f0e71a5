use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Blob store backed by a single directory. Files are stored under
/// server-generated unique names; the original client name is kept only in
/// the metadata row.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Generates a collision-free storage name, keeping the original
    /// extension when it looks sane.
    pub fn unique_name(original_name: &str) -> String {
        let stem = Uuid::new_v4().to_string();

        match Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    /// Storage keys are bare names; anything that could escape the root
    /// directory is rejected before it reaches the filesystem.
    pub fn is_safe_filename(filename: &str) -> bool {
        !filename.is_empty()
            && !filename.contains('/')
            && !filename.contains('\\')
            && !filename.contains("..")
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_for(filename).is_file()
    }

    pub async fn store(&self, src: &Path, filename: &str) -> io::Result<u64> {
        tokio::fs::copy(src, self.path_for(filename)).await
    }

    pub async fn remove(&self, filename: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.path_for(filename)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_name_keeps_lowercased_extension() {
        let name = DiskStorage::unique_name("Photo.PNG");
        assert!(name.ends_with(".png"));

        let other = DiskStorage::unique_name("Photo.PNG");
        assert_ne!(name, other);
    }

    #[test]
    fn unique_name_drops_suspicious_extension() {
        let name = DiskStorage::unique_name("weird.p/ng");
        assert!(!name.contains('/'));

        let bare = DiskStorage::unique_name("no-extension");
        assert!(!bare.contains('.'));
    }

    #[test]
    fn safe_filename_rejects_traversal() {
        assert!(DiskStorage::is_safe_filename("abc.png"));
        assert!(!DiskStorage::is_safe_filename(""));
        assert!(!DiskStorage::is_safe_filename("../etc/passwd"));
        assert!(!DiskStorage::is_safe_filename("a/b.png"));
        assert!(!DiskStorage::is_safe_filename("a\\b.png"));
    }

    #[actix_rt::test]
    async fn store_then_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path());

        let src = dir.path().join("src.bin");
        std::fs::write(&src, b"hello").unwrap();

        let written = storage.store(&src, "blob.bin").await.unwrap();
        assert_eq!(written, 5);
        assert!(storage.exists("blob.bin"));

        storage.remove("blob.bin").await.unwrap();
        assert!(!storage.exists("blob.bin"));
    }
}
