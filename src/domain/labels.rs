use crate::domain::version::BumpPolicy;
use crate::error::{GhOpsError, Result};
use std::collections::HashMap;

/// Determine the bump policy from pull request labels
///
/// Labels are checked in the order the PR carries them; the first one present
/// in the mapping wins. Returns `None` when no label matches, leaving the
/// decision to the caller (which falls back to a timestamp bump).
///
/// The mapping comes from configuration, label name to policy name
/// (e.g., "semver:major" -> "major").
pub fn policy_from_labels(
    labels: &[String],
    mapping: &HashMap<String, String>,
) -> Result<Option<BumpPolicy>> {
    for label in labels {
        if let Some(policy_name) = mapping.get(label) {
            let policy = policy_name.parse::<BumpPolicy>().map_err(|e| {
                GhOpsError::config(format!("bad label mapping for '{}': {}", label, e))
            })?;
            return Ok(Some(policy));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_policy_from_labels_matches_semver_labels() {
        let mapping = config::Config::default().labels;
        let labels = vec!["bug".to_string(), "semver:minor".to_string()];
        let policy = policy_from_labels(&labels, &mapping).unwrap();
        assert_eq!(policy, Some(BumpPolicy::Minor));
    }

    #[test]
    fn test_policy_from_labels_first_match_wins() {
        let mapping = config::Config::default().labels;
        let labels = vec!["semver:major".to_string(), "semver:patch".to_string()];
        let policy = policy_from_labels(&labels, &mapping).unwrap();
        assert_eq!(policy, Some(BumpPolicy::Major));
    }

    #[test]
    fn test_policy_from_labels_no_match() {
        let mapping = config::Config::default().labels;
        let labels = vec!["documentation".to_string()];
        assert_eq!(policy_from_labels(&labels, &mapping).unwrap(), None);
    }

    #[test]
    fn test_policy_from_labels_bad_mapping() {
        let mut mapping = HashMap::new();
        mapping.insert("semver:major".to_string(), "huge".to_string());
        let labels = vec!["semver:major".to_string()];
        assert!(policy_from_labels(&labels, &mapping).is_err());
    }
}
