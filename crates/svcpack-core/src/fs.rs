//! Filesystem primitives shared by the pipeline stages.

use std::path::Path;

use crate::error::{PackageError, PackageResult};

/// Delete a generated file left over from a previous run.
///
/// A missing file is not an error.
pub fn remove_if_exists(path: &Path) -> PackageResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed previous file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PackageError::fs("remove", path, e)),
    }
}

/// Create `path` and its parents if absent
pub fn ensure_dir(path: &Path) -> PackageResult<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| PackageError::fs("create", path, e))?;
        tracing::debug!(path = %path.display(), "Created directory");
    }
    Ok(())
}

/// BLAKE3 digest of a file's content, hex encoded
pub fn hash_file(path: &Path) -> PackageResult<String> {
    let bytes = std::fs::read(path).map_err(|e| PackageError::fs("read", path, e))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_if_exists_ignores_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        remove_if_exists(&temp.path().join("nothing.txt")).unwrap();
    }

    #[test]
    fn remove_if_exists_deletes_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("old.xml");
        std::fs::write(&path, "old").unwrap();

        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn remove_if_exists_fails_on_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = remove_if_exists(temp.path()).unwrap_err();
        assert!(matches!(err, PackageError::FileSystem { action: "remove", .. }));
    }

    #[test]
    fn ensure_dir_creates_parents() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn hash_file_is_deterministic() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pkg.zip");
        std::fs::write(&path, b"content").unwrap();

        let first = hash_file(&path).unwrap();
        assert_eq!(first, hash_file(&path).unwrap());
        assert_eq!(first.len(), 64);
    }
}
