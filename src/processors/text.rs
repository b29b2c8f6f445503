//! Single-pass multi-key text replacement.

use aho_corasick::{AhoCorasickBuilder, MatchKind};

/// Replace every occurrence of each key with the value at the same index,
/// in one scan over `text`.
///
/// Values are substituted verbatim and never rescanned, so the pass is
/// non-recursive; any references inside values must have been resolved
/// beforehand. When one key prefixes another, the longer key wins.
pub fn replace(text: &str, keys: &[String], values: &[String]) -> String {
    debug_assert_eq!(keys.len(), values.len());

    if keys.is_empty() {
        return text.to_string();
    }

    AhoCorasickBuilder::new()
        .match_kind(MatchKind::LeftmostLongest)
        .build(keys)
        .replace_all(text, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_replaces_all_keys_in_one_pass() {
        let out = replace(
            "{{a}} and {{b}} and {{a}}",
            &owned(&["{{a}}", "{{b}}"]),
            &owned(&["1", "2"]),
        );

        assert_eq!(out, "1 and 2 and 1");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        // A value that happens to contain another key stays verbatim.
        let out = replace("{{a}}", &owned(&["{{a}}", "{{b}}"]), &owned(&["{{b}}", "2"]));
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn test_longest_key_wins_on_shared_prefix() {
        let out = replace(
            "v$a$b v$a",
            &owned(&["v$a", "v$a$b"]),
            &owned(&["one", "two"]),
        );

        assert_eq!(out, "two one");
    }

    #[test]
    fn test_no_keys_returns_text_unchanged() {
        assert_eq!(replace("as is", &[], &[]), "as is");
    }
}
