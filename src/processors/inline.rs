use std::sync::Arc;

use super::{Processor, ProcessorContext, ProcessorError};
use crate::events::Notifier;
use crate::scripting::ScriptEngine;
use crate::sigils::{PREFIX, SUFFIX};

/// Evaluates inline script expressions embedded in the document and
/// splices each result in place of its marker.
///
/// A marker is `PREFIX source SUFFIX`; a marker with no terminator is
/// literal text. A marker whose evaluation fails is reported and
/// re-emitted verbatim, so the document never aborts. While the engine is
/// not ready, every marker stays literal.
pub struct InlineScriptProcessor {
    engine: Arc<ScriptEngine>,
    notifier: Notifier,
}

impl InlineScriptProcessor {
    /// Construction runs the one-time bootstrap with the context's
    /// resolved definitions and working directory. Rebuilding the stage
    /// re-initializes; rebinding is allowed.
    pub fn new(context: &ProcessorContext) -> Self {
        let engine = context.engine();

        engine.bootstrap(
            &context.workspace().bootstrap_script,
            &context.workspace().working_directory,
            &context.definitions().entries(),
        );

        Self {
            engine,
            notifier: context.notifier().clone(),
        }
    }
}

impl Processor for InlineScriptProcessor {
    fn apply(&self, text: &str) -> Result<String, ProcessorError> {
        if !self.engine.is_ready() {
            return Ok(text.to_string());
        }

        let mut output = String::with_capacity(text.len() * 2);
        let mut rest = text;

        while let Some(start) = rest.find(PREFIX) {
            let source_start = start + PREFIX.len();

            let Some(offset) = rest[source_start..].find(SUFFIX) else {
                // Unterminated marker: the rest of the text is literal.
                break;
            };

            output.push_str(&rest[..start]);
            let source = &rest[source_start..source_start + offset];

            match self.engine.eval_cached(source, |raw| raw.trim().to_string()) {
                Ok(result) => output.push_str(&result),
                Err(error) => {
                    self.notifier.notify(error.to_string());
                    output.push_str(PREFIX);
                    output.push_str(source);
                    output.push_str(SUFFIX);
                }
            }

            rest = &rest[source_start + offset + SUFFIX.len()..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workspace;
    use crate::definitions::InterpolatingMap;
    use crate::sigils::{SigilKeyOperator, Sigils};
    use pretty_assertions::assert_eq;

    fn stage() -> InlineScriptProcessor {
        let map = InterpolatingMap::new(SigilKeyOperator::new(Sigils::default()));
        let context =
            ProcessorContext::new(Arc::new(map), Workspace::default(), Notifier::silent());

        InlineScriptProcessor::new(&context)
    }

    #[test]
    fn test_marker_replaced_by_result() {
        let out = stage().apply("A `r#1+1` B").unwrap();
        assert_eq!(out, "A 2 B");
    }

    #[test]
    fn test_multiple_markers_in_one_line() {
        let out = stage().apply("`r#1+1`-`r#2*3`").unwrap();
        assert_eq!(out, "2-6");
    }

    #[test]
    fn test_unterminated_marker_left_verbatim() {
        let out = stage().apply("A `r#1+1 B").unwrap();
        assert_eq!(out, "A `r#1+1 B");
    }

    #[test]
    fn test_text_after_last_marker_survives() {
        let out = stage().apply("x `r#40+2` tail text").unwrap();
        assert_eq!(out, "x 42 tail text");
    }

    #[test]
    fn test_failed_expression_reemitted_and_reported() {
        let map = InterpolatingMap::new(SigilKeyOperator::new(Sigils::default()));
        let (notifier, events) = Notifier::channel();
        let context = ProcessorContext::new(Arc::new(map), Workspace::default(), notifier);
        let stage = InlineScriptProcessor::new(&context);

        let out = stage.apply("keep `r#oops(` going").unwrap();

        assert_eq!(out, "keep `r#oops(` going");
        assert!(events.try_recv().is_ok());
    }

    #[test]
    fn test_unready_engine_treats_markers_as_literal() {
        let map = InterpolatingMap::new(SigilKeyOperator::new(Sigils::default()));
        let mut workspace = Workspace::default();
        workspace.bootstrap_script = "not a valid script(".to_string();
        let context = ProcessorContext::new(Arc::new(map), workspace, Notifier::silent());

        let stage = InlineScriptProcessor::new(&context);

        assert_eq!(stage.apply("A `r#1+1` B").unwrap(), "A `r#1+1` B");
    }

    #[test]
    fn test_identical_markers_evaluate_once() {
        let stage = stage();

        // Both markers hit the same cache entry; equality of output is
        // the observable contract here.
        let out = stage.apply("`r#9*9` and `r#9*9`").unwrap();
        assert_eq!(out, "81 and 81");
    }
}
