//! Live filesystem adapter using `std::fs`.

use std::io::Write;
use std::path::Path;

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        Ok(std::fs::read(path)?)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn append(&self, path: &Path, contents: &[u8]) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_then_extends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".meta/index.properties");
        LiveFileSystem.append(&path, b"a\n").unwrap();
        LiveFileSystem.append(&path, b"b\n").unwrap();
        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "a\nb\n");
        assert!(LiveFileSystem.is_file(&path));
        assert!(!LiveFileSystem.is_file(dir.path()));
    }
}
