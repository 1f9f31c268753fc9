//! Operation handlers - one per pipeline action
//!
//! Each handler composes the version model and the GitHub adapter, writes its
//! primary result to a hand-off file for the next pipeline stage, and returns
//! the computed value for display.

pub mod bump_version;
pub mod create_release;
pub mod get_version;
pub mod update_submodule;

use crate::error::{GhOpsError, Result};
use crate::{handoff, ui};

/// Resolve the version a handler should operate on.
///
/// The hand-off file written by the previous stage wins; the CLI flag is the
/// fallback for invocations outside a full pipeline run. Having neither is a
/// missing-parameter error.
pub(crate) fn resolve_version(
    file: &str,
    flag: Option<&str>,
    flag_name: &'static str,
) -> Result<String> {
    match handoff::read_version(file)? {
        Some(version) => {
            ui::display_status(&format!("Read version {} from {}", version, file));
            Ok(version)
        }
        None => match flag {
            Some(version) => {
                ui::display_status(&format!("{} not found, using --{}", file, flag_name));
                Ok(version.to_string())
            }
            None => Err(GhOpsError::missing(flag_name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_version_prefers_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current_version.txt");
        handoff::write_version(path.to_str().unwrap(), &Version::new(3, 0, 0)).unwrap();

        let resolved =
            resolve_version(path.to_str().unwrap(), Some("v1.0.0"), "current-version").unwrap();
        assert_eq!(resolved, "v3.0.0");
    }

    #[test]
    fn test_resolve_version_falls_back_to_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current_version.txt");

        let resolved =
            resolve_version(path.to_str().unwrap(), Some("v1.0.0"), "current-version").unwrap();
        assert_eq!(resolved, "v1.0.0");
    }

    #[test]
    fn test_resolve_version_missing_everywhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("current_version.txt");

        let err = resolve_version(path.to_str().unwrap(), None, "current-version").unwrap_err();
        assert!(matches!(err, GhOpsError::MissingParameter(_)));
    }
}
