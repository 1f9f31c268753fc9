use crate::error::{GhOpsError, Result};
use chrono::Utc;
use std::fmt;
use std::str::FromStr;

/// Release version: a semantic triple with an optional build timestamp suffix
///
/// Rendered as `vMAJOR.MINOR.PATCH` or `vMAJOR.MINOR.PATCH-YYYYMMDDHHMMSS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub timestamp: Option<String>,
}

/// Which part of a version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPolicy {
    Major,
    Minor,
    Patch,
    Timestamp,
}

impl Version {
    /// Seed version used when a repository has no releases yet
    pub const SEED: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
        timestamp: None,
    };

    /// Create a new version without a timestamp suffix
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            timestamp: None,
        }
    }

    /// Parse a version from a release tag (e.g., "v1.2.3" or "v1.2.3-20240116120000")
    ///
    /// The leading 'v' is required; a bare "1.2.3" is rejected. A suffix, when
    /// present, must be all digits.
    pub fn parse(tag: &str) -> Result<Self> {
        let rest = tag.strip_prefix('v').ok_or_else(|| {
            GhOpsError::invalid_version(format!("'{}' - expected vMAJOR.MINOR.PATCH", tag))
        })?;

        let (triple, timestamp) = match rest.split_once('-') {
            Some((triple, suffix)) => (triple, Some(suffix)),
            None => (rest, None),
        };

        let parts: Vec<&str> = triple.split('.').collect();
        if parts.len() != 3 {
            return Err(GhOpsError::invalid_version(format!(
                "'{}' - expected vMAJOR.MINOR.PATCH",
                tag
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| GhOpsError::invalid_version(format!("invalid major version: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| GhOpsError::invalid_version(format!("invalid minor version: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| GhOpsError::invalid_version(format!("invalid patch version: {}", parts[2])))?;

        let timestamp = match timestamp {
            Some(suffix) => {
                if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
                    return Err(GhOpsError::invalid_version(format!(
                        "invalid timestamp suffix: {}",
                        suffix
                    )));
                }
                Some(suffix.to_string())
            }
            None => None,
        };

        Ok(Version {
            major,
            minor,
            patch,
            timestamp,
        })
    }

    /// Bump the version according to the policy
    ///
    /// Major/minor/patch bumps reset the lower components and drop any
    /// timestamp suffix; a timestamp bump keeps the triple and replaces the
    /// suffix with the current UTC time.
    pub fn bump(&self, policy: BumpPolicy) -> Self {
        match policy {
            BumpPolicy::Major => Version::new(self.major + 1, 0, 0),
            BumpPolicy::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpPolicy::Patch => Version::new(self.major, self.minor, self.patch + 1),
            BumpPolicy::Timestamp => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch,
                timestamp: Some(utc_timestamp()),
            },
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(timestamp) = &self.timestamp {
            write!(f, "-{}", timestamp)?;
        }
        Ok(())
    }
}

impl FromStr for BumpPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "major" => Ok(BumpPolicy::Major),
            "minor" => Ok(BumpPolicy::Minor),
            "patch" => Ok(BumpPolicy::Patch),
            "timestamp" => Ok(BumpPolicy::Timestamp),
            other => Err(format!(
                "unknown version type '{}' (expected major, minor, patch or timestamp)",
                other
            )),
        }
    }
}

impl fmt::Display for BumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpPolicy::Major => "major",
            BumpPolicy::Minor => "minor",
            BumpPolicy::Patch => "patch",
            BumpPolicy::Timestamp => "timestamp",
        };
        write!(f, "{}", name)
    }
}

/// Current UTC time as a 14-digit YYYYMMDDHHMMSS token
fn utc_timestamp() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert_eq!(v.timestamp, None);
    }

    #[test]
    fn test_version_parse_with_timestamp() {
        let v = Version::parse("v1.2.3-20240116120000").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.timestamp, Some("20240116120000".to_string()));
    }

    #[test]
    fn test_version_parse_requires_v_prefix() {
        assert!(Version::parse("1.2.3").is_err());
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("v1.2").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("v1.a.3").is_err());
        assert!(Version::parse("v1.2.3-rc1").is_err());
        assert!(Version::parse("v1.2.3-").is_err());
    }

    #[test]
    fn test_version_roundtrip() {
        for tag in ["v0.0.0", "v1.2.3", "v10.20.30", "v1.2.3-20240116120000"] {
            let v = Version::parse(tag).unwrap();
            assert_eq!(v.to_string(), tag);
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::parse("v1.2.3-20240116120000").unwrap();
        let bumped = v.bump(BumpPolicy::Major);
        assert_eq!(bumped, Version::new(2, 0, 0));
        assert_eq!(bumped.timestamp, None);
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(BumpPolicy::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(BumpPolicy::Patch), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_timestamp() {
        let v = Version::new(1, 2, 3);
        let bumped = v.bump(BumpPolicy::Timestamp);
        assert_eq!(bumped.major, 1);
        assert_eq!(bumped.minor, 2);
        assert_eq!(bumped.patch, 3);

        let suffix = bumped.timestamp.expect("timestamp suffix should be set");
        assert_eq!(suffix.len(), 14);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_version_bump_timestamp_replaces_existing() {
        let v = Version::parse("v1.2.3-19990101000000").unwrap();
        let bumped = v.bump(BumpPolicy::Timestamp);
        assert_ne!(bumped.timestamp, Some("19990101000000".to_string()));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "v1.2.3");
        assert_eq!(Version::SEED.to_string(), "v0.0.0");
    }

    #[test]
    fn test_bump_policy_from_str() {
        assert_eq!("major".parse::<BumpPolicy>().unwrap(), BumpPolicy::Major);
        assert_eq!("minor".parse::<BumpPolicy>().unwrap(), BumpPolicy::Minor);
        assert_eq!("patch".parse::<BumpPolicy>().unwrap(), BumpPolicy::Patch);
        assert_eq!(
            "timestamp".parse::<BumpPolicy>().unwrap(),
            BumpPolicy::Timestamp
        );
        assert!("hotfix".parse::<BumpPolicy>().is_err());
    }
}
