//! Branch update policy: does an observed branch fall under the configured
//! branch specification?

use crate::config::BranchSpec;
use crate::pattern;

/// Returns true if `branch` matches the configured specification. A list
/// matches if any of its patterns match.
pub fn should_update(branch: &str, spec: &BranchSpec) -> bool {
    match spec {
        BranchSpec::One(pattern) => pattern::matches(branch, pattern),
        BranchSpec::Many(patterns) => patterns.iter().any(|p| pattern::matches(branch, p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_spec_matches_any_element() {
        let spec = BranchSpec::Many(vec!["master".to_string(), "release-*".to_string()]);
        assert!(should_update("release-2", &spec));
        assert!(should_update("master", &spec));
        assert!(!should_update("hotfix", &spec));
    }

    #[test]
    fn scalar_spec_delegates_to_pattern() {
        let spec = BranchSpec::One("master".to_string());
        assert!(should_update("master", &spec));
        assert!(!should_update("dev", &spec));

        let wildcard = BranchSpec::One("*".to_string());
        assert!(should_update("anything", &wildcard));
    }
}
