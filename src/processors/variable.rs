use super::{Processor, ProcessorContext, ProcessorError, text};
use crate::sigils::{ScriptKeyOperator, escape};

/// Replaces every wrapped definition key with its resolved value in a
/// single non-recursive pass: `{{tree.leaf}}` becomes the value of
/// `tree.leaf`.
pub struct VariableProcessor {
    keys: Vec<String>,
    values: Vec<String>,
}

impl VariableProcessor {
    pub fn new(context: &ProcessorContext) -> Self {
        let operator = context.definitions().operator();
        let entries = context.definitions().entries();

        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            keys.push(operator.apply(&key));
            values.push(value);
        }

        Self { keys, values }
    }
}

impl Processor for VariableProcessor {
    fn apply(&self, text: &str) -> Result<String, ProcessorError> {
        Ok(text::replace(text, &self.keys, &self.values))
    }
}

/// Renames every resolved definition key into scripting-member syntax and
/// escapes its value, then substitutes the member names across the text
/// in a single non-recursive pass: `v$tree$leaf` becomes the quoted,
/// escaped value of `tree.leaf`.
///
/// Running this before the inline-expression stage means embedded
/// expressions reference definition values as plain literals, whether or
/// not the bootstrap bound them in the engine scope.
pub struct ScriptVariableProcessor {
    keys: Vec<String>,
    values: Vec<String>,
}

impl ScriptVariableProcessor {
    pub fn new(context: &ProcessorContext) -> Self {
        let renamer = ScriptKeyOperator::new();
        let entries = context.definitions().entries();

        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            keys.push(renamer.apply(&key));
            values.push(escape(&value));
        }

        Self { keys, values }
    }
}

impl Processor for ScriptVariableProcessor {
    fn apply(&self, text: &str) -> Result<String, ProcessorError> {
        Ok(text::replace(text, &self.keys, &self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workspace;
    use crate::definitions::InterpolatingMap;
    use crate::events::Notifier;
    use crate::sigils::{SigilKeyOperator, Sigils};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn context_of(entries: &[(&str, &str)]) -> ProcessorContext {
        let map = InterpolatingMap::with_entries(
            SigilKeyOperator::new(Sigils::default()),
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        map.interpolate().unwrap();

        ProcessorContext::new(Arc::new(map), Workspace::default(), Notifier::silent())
    }

    #[test]
    fn test_variable_processor_substitutes_values() {
        let context = context_of(&[("tree.leaf", "oak"), ("tree.root", "deep")]);
        let stage = VariableProcessor::new(&context);

        let out = stage.apply("a {{tree.leaf}} with {{tree.root}} roots").unwrap();

        assert_eq!(out, "a oak with deep roots");
    }

    #[test]
    fn test_variable_processor_leaves_unknown_keys() {
        let context = context_of(&[("known", "yes")]);
        let stage = VariableProcessor::new(&context);

        assert_eq!(
            stage.apply("{{known}} {{unknown}}").unwrap(),
            "yes {{unknown}}"
        );
    }

    #[test]
    fn test_script_processor_substitutes_member_names() {
        let context = context_of(&[("tree.leaf", "oak")]);
        let stage = ScriptVariableProcessor::new(&context);

        let out = stage.apply("`r#v$tree$leaf` stays v$tree").unwrap();

        assert_eq!(out, "`r#'oak'` stays v$tree");
    }

    #[test]
    fn test_script_processor_escapes_values() {
        let context = context_of(&[("quote", "it's")]);
        let stage = ScriptVariableProcessor::new(&context);

        assert_eq!(stage.apply("v$quote").unwrap(), "'it\\'s'");
    }

    #[test]
    fn test_substitution_is_single_pass() {
        // A value containing a member name is not substituted again.
        let context = context_of(&[("a", "v$b"), ("b", "2")]);
        let stage = ScriptVariableProcessor::new(&context);

        assert_eq!(stage.apply("v$a").unwrap(), "'v$b'");
    }
}
