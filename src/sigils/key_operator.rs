use regex::Regex;

use super::Sigils;

/// One sigil-delimited reference found in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'t> {
    /// The whole delimited token, sigils included.
    pub token: &'t str,
    /// The bare key captured between the sigils.
    pub key: &'t str,
}

/// Wraps bare keys in a sigil pair and finds wrapped references in text.
///
/// The non-greedy matcher `began(.*?)ended` is compiled once at
/// construction; a new operator must be built whenever the sigils change.
#[derive(Debug, Clone)]
pub struct SigilKeyOperator {
    sigils: Sigils,
    matcher: Regex,
}

impl SigilKeyOperator {
    pub fn new(sigils: Sigils) -> Self {
        let matcher = Regex::new(&format!(
            "{}(.*?){}",
            regex::escape(sigils.began()),
            regex::escape(sigils.ended()),
        ))
        .expect("escaped sigil pattern always compiles");

        Self { sigils, matcher }
    }

    pub fn sigils(&self) -> &Sigils {
        &self.sigils
    }

    /// Wrap a bare key in the sigil pair.
    ///
    /// # Panics
    ///
    /// Panics when the key already carries either delimiter; wrapping twice
    /// is a programmer error.
    pub fn apply(&self, key: &str) -> String {
        let began = self.sigils.began();
        let ended = self.sigils.ended();

        assert!(
            (began.is_empty() || !key.contains(began))
                && (ended.is_empty() || !key.contains(ended)),
            "key is already sigil-wrapped: {key}"
        );

        format!("{began}{key}{ended}")
    }

    /// Strip the sigil pair from a wrapped key; unwrapped input is returned
    /// unchanged.
    pub fn dewrap<'a>(&self, wrapped: &'a str) -> &'a str {
        wrapped
            .strip_prefix(self.sigils.began())
            .and_then(|s| s.strip_suffix(self.sigils.ended()))
            .unwrap_or(wrapped)
    }

    /// All wrapped references in `text`, in order of occurrence.
    pub fn references<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Reference<'t>> + 't {
        self.matcher.captures_iter(text).map(|captures| Reference {
            token: captures.get(0).expect("whole match").as_str(),
            key: captures.get(1).expect("capture group one").as_str(),
        })
    }
}
