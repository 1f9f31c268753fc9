//! Hand-off files passing a computed version between pipeline stages.
//!
//! Each stage runs as a separate process; the only state crossing the
//! boundary is a single formatted version string in a plain-text file in the
//! working directory. The orchestrator serializes stage execution, so no
//! locking is done here.

use crate::domain::Version;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Read a version string from a hand-off file, if it exists.
///
/// Returns `Ok(None)` when the file is absent so callers can fall back to a
/// CLI-supplied value. Surrounding whitespace is trimmed.
pub fn read_version(file: &str) -> Result<Option<String>> {
    let path = Path::new(file);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    Ok(Some(raw.trim().to_string()))
}

/// Write a formatted version to a hand-off file, overwriting any previous value.
pub fn write_version(file: &str, version: &Version) -> Result<()> {
    fs::write(file, version.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current_version.txt");
        let result = read_version(path.to_str().unwrap()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new_version.txt");
        let file = path.to_str().unwrap();

        let version = Version::parse("v1.2.3").unwrap();
        write_version(file, &version).unwrap();

        assert_eq!(read_version(file).unwrap(), Some("v1.2.3".to_string()));
    }

    #[test]
    fn test_read_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current_version.txt");
        fs::write(&path, "v2.0.0\n").unwrap();

        let result = read_version(path.to_str().unwrap()).unwrap();
        assert_eq!(result, Some("v2.0.0".to_string()));
    }

    #[test]
    fn test_write_overwrites_previous_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new_version.txt");
        let file = path.to_str().unwrap();

        write_version(file, &Version::parse("v1.0.0").unwrap()).unwrap();
        write_version(file, &Version::parse("v1.1.0").unwrap()).unwrap();

        assert_eq!(read_version(file).unwrap(), Some("v1.1.0".to_string()));
    }
}
