//! Asset access
//!
//! The decoder never touches storage directly; it asks an [`AssetReader`]
//! whether a named resource exists and for its bytes. Paths are always
//! `/`-separated and relative, e.g. `levels/world1_stage1.json`.

use crate::{LevelError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Byte-level access to named resources
pub trait AssetReader: Send + Sync {
    /// Check whether a resource exists
    fn exists(&self, path: &str) -> bool;

    /// Read the full contents of a resource
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

impl<T: AssetReader + ?Sized> AssetReader for &T {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read(path)
    }
}

impl<T: AssetReader + ?Sized> AssetReader for Arc<T> {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// Reads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct FsAssetReader {
    root: PathBuf,
}

impl FsAssetReader {
    /// Create a reader rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory asset paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        full.extend(path.split('/').filter(|part| !part.is_empty()));
        full
    }
}

impl AssetReader for FsAssetReader {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let access_error = |source: io::Error| LevelError::AssetAccess {
            path: path.to_string(),
            source,
        };

        let mut file = fs::File::open(self.resolve(path)).map_err(access_error)?;
        let expected = file.metadata().map_err(access_error)?.len();

        let mut data = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
        file.read_to_end(&mut data).map_err(access_error)?;

        if (data.len() as u64) < expected {
            return Err(access_error(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read {} of {} bytes", data.len(), expected),
            )));
        }

        Ok(data)
    }
}

/// In-memory asset store, for bundled content and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetReader {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset
    pub fn insert<P: Into<String>, B: Into<Vec<u8>>>(&mut self, path: P, bytes: B) {
        self.assets.insert(path.into(), bytes.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_asset<P: Into<String>, B: Into<Vec<u8>>>(mut self, path: P, bytes: B) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Remove an asset, returning its bytes
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.assets.remove(path)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetReader for MemoryAssetReader {
    fn exists(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| LevelError::AssetAccess {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "asset not found"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_reader() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("levels")).unwrap();
        std::fs::write(temp_dir.path().join("levels/a.json"), b"{}").unwrap();

        let reader = FsAssetReader::new(temp_dir.path());
        assert!(reader.exists("levels/a.json"));
        assert!(!reader.exists("levels/b.json"));
        assert!(!reader.exists("levels"));
        assert_eq!(reader.read("levels/a.json").unwrap(), b"{}");
    }

    #[test]
    fn test_fs_reader_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = FsAssetReader::new(temp_dir.path());

        match reader.read("levels/none.json") {
            Err(LevelError::AssetAccess { path, source }) => {
                assert_eq!(path, "levels/none.json");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected asset access error, got {:?}", other),
        }
    }

    #[test]
    fn test_memory_reader() {
        let mut reader = MemoryAssetReader::new().with_asset("levels/x.json", "[]");
        assert!(reader.exists("levels/x.json"));
        assert_eq!(reader.read("levels/x.json").unwrap(), b"[]");
        assert_eq!(reader.len(), 1);

        reader.remove("levels/x.json");
        assert!(reader.is_empty());
        assert!(matches!(
            reader.read("levels/x.json"),
            Err(LevelError::AssetAccess { .. })
        ));
    }

    #[test]
    fn test_shared_reader() {
        let reader = Arc::new(MemoryAssetReader::new().with_asset("a", "1"));
        let by_ref: &dyn AssetReader = &reader;
        assert!(by_ref.exists("a"));
    }
}
