use serde::{Deserialize, Serialize};

/// Delimiter pair marking where a variable reference begins and ends.
///
/// The pair is immutable: compiled matchers capture the delimiter values at
/// construction time, so changing delimiters means building a new `Sigils`
/// and reconstructing everything derived from the old pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sigils {
    began: String,
    ended: String,
}

impl Sigils {
    pub fn new(began: impl Into<String>, ended: impl Into<String>) -> Self {
        Self {
            began: began.into(),
            ended: ended.into(),
        }
    }

    pub fn began(&self) -> &str {
        &self.began
    }

    pub fn ended(&self) -> &str {
        &self.ended
    }
}

impl Default for Sigils {
    /// Moustache-style document delimiters.
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}
