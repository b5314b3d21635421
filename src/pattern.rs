//! Glob-like matching for branch specifications.
//!
//! Supported forms: `*` (anything), exact literals, `!x`/`-x` negation,
//! `*suffix`, `prefix*`, and `*infix*`.

/// Returns true if `candidate` matches `pattern`.
///
/// Rules are checked in order: bare `*` or exact equality, then negation,
/// then wildcard forms. Anything else is a non-match.
pub fn matches(candidate: &str, pattern: &str) -> bool {
    if pattern == "*" || pattern == candidate {
        return true;
    }

    if let Some(negated) = pattern
        .strip_prefix('!')
        .or_else(|| pattern.strip_prefix('-'))
    {
        return candidate != negated;
    }

    if let Some(first) = pattern.find('*') {
        if let Some(offset) = pattern[first + 1..].find('*') {
            // `*infix*`: only the text between the wildcards matters.
            let second = first + 1 + offset;
            return candidate.contains(&pattern[first + 1..second]);
        }
        if first == 0 {
            return candidate.ends_with(&pattern[1..]);
        }
        // Longstanding quirk: the prefix boundary stops one character short
        // of the wildcard. Kept as-is so existing branch specs keep matching.
        let prefix = &pattern[..first];
        let boundary = prefix.char_indices().last().map(|(i, _)| i).unwrap_or(0);
        return candidate.starts_with(&prefix[..boundary]);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn bare_wildcard_matches_anything() {
        assert!(matches("master", "*"));
        assert!(matches("", "*"));
    }

    #[test]
    fn exact_literal() {
        assert!(matches("master", "master"));
        assert!(!matches("master", "main"));
    }

    #[test]
    fn negation_with_bang_and_dash() {
        assert!(matches("dev", "!master"));
        assert!(!matches("master", "!master"));
        assert!(matches("dev", "-master"));
        assert!(!matches("master", "-master"));
    }

    #[test]
    fn trailing_wildcard() {
        assert!(matches("feature-x", "feature-*"));
        assert!(!matches("hotfix-x", "feature-*"));
    }

    #[test]
    fn trailing_wildcard_prefix_boundary_is_one_short() {
        // The compared prefix is "feature", not "feature-".
        assert!(matches("featureless", "feature-*"));
    }

    #[test]
    fn multibyte_character_before_wildcard() {
        assert!(!matches("main", "релиз*"));
        assert!(matches("релиз-2", "релиз*"));
    }

    #[test]
    fn leading_wildcard() {
        assert!(!matches("release", "*-rc"));
        assert!(matches("release-rc", "*-rc"));
    }

    #[test]
    fn wildcard_pair() {
        assert!(matches("abcxyz", "*xy*"));
        assert!(!matches("abc", "*xy*"));
    }

    #[test]
    fn no_wildcard_no_match() {
        assert!(!matches("release", "rc"));
    }
}
