use super::{SigilKeyOperator, Sigils};

/// Opens an inline script expression embedded in document text.
pub const PREFIX: &str = "`r#";
/// Closes an inline script expression.
pub const SUFFIX: &str = "`";

const KEY_SEPARATOR_DOC: char = '.';
const KEY_SEPARATOR_SCRIPT: char = '$';

/// Converts dot-separated definition keys into scripting-member syntax:
/// `variable.name.qualified` becomes `v$variable$name$qualified`.
///
/// The reserved `v$` prefix and the first key character are never altered,
/// so a leading dot survives the translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptKeyOperator;

impl ScriptKeyOperator {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, key: &str) -> String {
        debug_assert!(!key.trim().is_empty());

        let mut name = String::with_capacity(key.len() + 2);
        name.push('v');
        name.push(KEY_SEPARATOR_SCRIPT);

        for (i, ch) in key.chars().enumerate() {
            if i > 0 && ch == KEY_SEPARATOR_DOC {
                name.push(KEY_SEPARATOR_SCRIPT);
            } else {
                name.push(ch);
            }
        }

        name
    }
}

/// Produces a complete inline expression for a wrapped document key:
/// `{{tree.leaf}}` becomes `` `r#v$tree$leaf` `` (with the configured
/// script delimiters, empty by default, around the member name).
pub struct ScriptSigilOperator {
    sigils: Sigils,
    antecedent: SigilKeyOperator,
    renamer: ScriptKeyOperator,
}

impl ScriptSigilOperator {
    /// `sigils` delimit the expression inside the marker; `antecedent` is
    /// the document codec whose wrapping is removed first.
    pub fn new(sigils: Sigils, antecedent: SigilKeyOperator) -> Self {
        Self {
            sigils,
            antecedent,
            renamer: ScriptKeyOperator::new(),
        }
    }

    pub fn apply(&self, key: &str) -> String {
        format!(
            "{PREFIX}{}{}{}{SUFFIX}",
            self.sigils.began(),
            self.entoken(key),
            self.sigils.ended(),
        )
    }

    /// De-wrap the document syntax, then re-encode as a member name.
    fn entoken(&self, key: &str) -> String {
        self.renamer.apply(self.antecedent.dewrap(key))
    }
}

/// Quote a resolved value for binding into the scripting engine.
///
/// The value is wrapped in single quotes with every embedded single quote
/// escaped; all other characters, newlines included, pass through verbatim.
pub fn escape(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');

    for ch in value.chars() {
        if ch == '\'' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }

    quoted.push('\'');
    quoted
}
