//! `rolegate-matcher` — stateless permission pattern matching.
//!
//! Permission keys are colon-delimited segment lists. A granted *pattern* may
//! contain two wildcard segments:
//!
//! - `*` matches exactly one segment (never zero, never more);
//! - `**` matches every remaining segment, including none, and is only
//!   meaningful as the final pattern segment.
//!
//! Matching is pure string work: case-sensitive, no trimming, no validation.
//! Empty segments (from leading/trailing/doubled colons) are ordinary
//! segments that compare equal to other empty segments. Nothing here ever
//! panics or allocates on the hot path.

/// Does `pattern` cover `permission`?
///
/// ```
/// use rolegate_matcher::matches;
///
/// assert!(matches("entity:*:read", "entity:books:read"));
/// assert!(matches("entity:**", "entity:books:loans:read"));
/// assert!(!matches("entity:*:read", "entity:read"));
/// ```
pub fn matches(pattern: &str, permission: &str) -> bool {
    if pattern == "**" {
        return true;
    }

    let pattern_segments: Vec<&str> = pattern.split(':').collect();
    let permission_segments: Vec<&str> = permission.split(':').collect();
    let last = pattern_segments.len() - 1;

    for (i, &seg) in pattern_segments.iter().enumerate() {
        match seg {
            // Terminal `**` swallows whatever remains, including nothing.
            // A non-terminal `**` is not a wildcard; it falls through to the
            // literal comparison and can only match a literal `**` segment.
            "**" if i == last => return true,
            "*" => {
                if i >= permission_segments.len() {
                    return false;
                }
            }
            _ => {
                if i >= permission_segments.len() || seg != permission_segments[i] {
                    return false;
                }
            }
        }
    }

    // No trailing wildcard: the permission must not have extra segments.
    pattern_segments.len() == permission_segments.len()
}

/// Does any pattern in `patterns` cover `permission`?
///
/// An empty pattern list grants nothing.
pub fn any<S: AsRef<str>>(patterns: &[S], permission: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), permission))
}

/// The subset of `permissions` covered by `pattern`, in input order.
pub fn filter<S: AsRef<str>>(permissions: &[S], pattern: &str) -> Vec<String> {
    permissions
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| matches(pattern, p))
        .map(str::to_string)
        .collect()
}

/// Expand a pattern against a registered permission catalog: which concrete
/// permissions in `registry` does `pattern` grant? Preserves catalog order.
pub fn expand<S: AsRef<str>>(pattern: &str, registry: &[S]) -> Vec<String> {
    filter(registry, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(matches("entity:books:read", "entity:books:read"));
        assert!(!matches("entity:books:read", "entity:books:write"));
        assert!(!matches("entity:books:read", "entity:Books:read"));
    }

    #[test]
    fn exact_match_requires_equal_length() {
        // No implicit trailing wildcard in either direction.
        assert!(!matches("entity:books", "entity:books:read"));
        assert!(!matches("entity:books:read", "entity:books"));
    }

    #[test]
    fn single_wildcard_matches_exactly_one_segment() {
        assert!(matches("entity:*:read", "entity:books:read"));
        // Zero segments: fails.
        assert!(!matches("entity:*:read", "entity:read"));
        // Two segments: fails.
        assert!(!matches("entity:*:read", "entity:books:loans:read"));
    }

    #[test]
    fn single_wildcard_at_end() {
        assert!(matches("entity:books:*", "entity:books:read"));
        assert!(!matches("entity:books:*", "entity:books"));
        assert!(!matches("entity:books:*", "entity:books:read:extra"));
    }

    #[test]
    fn double_wildcard_alone_matches_everything() {
        assert!(matches("**", "anything"));
        assert!(matches("**", "a:b:c:d"));
        assert!(matches("**", ""));
    }

    #[test]
    fn double_wildcard_with_prefix() {
        assert!(matches("entity:**", "entity:x"));
        assert!(matches("entity:**", "entity:books:loans:read"));
        assert!(!matches("entity:**", "admin:x"));
        // Zero additional segments are allowed once the prefix matched.
        assert!(matches("entity:**", "entity"));
    }

    #[test]
    fn double_wildcard_not_last_is_literal() {
        assert!(!matches("entity:**:read", "entity:books:read"));
        assert!(matches("entity:**:read", "entity:**:read"));
    }

    #[test]
    fn empty_segments_are_ordinary_segments() {
        assert!(matches("a::b", "a::b"));
        assert!(!matches("a::b", "a:b"));
        assert!(matches("a:*:b", "a::b"));
        assert!(matches("", ""));
    }

    #[test]
    fn no_trimming_no_case_folding() {
        assert!(!matches(" entity:books:read", "entity:books:read"));
        assert!(!matches("ENTITY:*:read", "entity:books:read"));
    }

    #[test]
    fn any_over_empty_list_is_false() {
        let none: [&str; 0] = [];
        assert!(!any(&none, "entity:books:read"));
        assert!(any(&["**"], "entity:books:read"));
        assert!(any(&["admin:**", "entity:*:read"], "entity:books:read"));
    }

    #[test]
    fn any_mixed_patterns() {
        let patterns = ["entity:*:read", "entity:*:list"];
        assert!(!any(&patterns, "entity:books:create"));
        assert!(any(&patterns, "entity:books:read"));
    }

    #[test]
    fn filter_preserves_order() {
        let perms = [
            "entity:books:read",
            "entity:books:create",
            "entity:loans:read",
            "admin:settings:read",
        ];
        assert_eq!(
            filter(&perms, "entity:*:read"),
            vec!["entity:books:read", "entity:loans:read"]
        );
    }

    #[test]
    fn expand_against_catalog() {
        let catalog = ["auth:login", "entity:books:read", "entity:books:update"];
        assert_eq!(expand("entity:books:*", &catalog), vec![
            "entity:books:read",
            "entity:books:update"
        ]);
        assert_eq!(expand("nothing:*", &catalog), Vec::<String>::new());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// Strategy for a concrete (wildcard-free) permission key.
        fn concrete_key() -> impl Strategy<Value = String> {
            proptest::collection::vec("[a-z0-9_-]{1,8}", 1..5).prop_map(|segs| segs.join(":"))
        }

        proptest! {
            /// Any wildcard-free key matches itself.
            #[test]
            fn concrete_key_is_reflexive(key in concrete_key()) {
                prop_assert!(matches(&key, &key));
            }

            /// `**` covers every key.
            #[test]
            fn universal_pattern_matches_all(key in concrete_key()) {
                prop_assert!(matches("**", &key));
            }

            /// A key extended with extra segments is covered by `key:**` but
            /// never by the bare key.
            #[test]
            fn trailing_double_wildcard_covers_extensions(
                key in concrete_key(),
                extra in proptest::collection::vec("[a-z]{1,4}", 1..4),
            ) {
                let extended = format!("{}:{}", key, extra.join(":"));
                let pattern = format!("{}:**", key);
                prop_assert!(matches(&pattern, &extended));
                prop_assert!(!matches(&key, &extended));
            }

            /// Replacing one segment with `*` still matches the original key.
            #[test]
            fn star_substitution_matches_original(key in concrete_key(), idx in 0usize..5) {
                let mut segs: Vec<&str> = key.split(':').collect();
                let idx = idx % segs.len();
                segs[idx] = "*";
                let pattern = segs.join(":");
                prop_assert!(matches(&pattern, &key));
            }

            /// `filter` output is a subset of the input, in input order.
            #[test]
            fn filter_is_an_ordered_subset(
                keys in proptest::collection::vec(concrete_key(), 0..12),
                pattern in concrete_key(),
            ) {
                let filtered = filter(&keys, &pattern);
                let mut cursor = 0usize;
                for kept in &filtered {
                    let pos = keys[cursor..].iter().position(|k| k == kept);
                    prop_assert!(pos.is_some());
                    cursor += pos.unwrap() + 1;
                }
            }
        }
    }
}
