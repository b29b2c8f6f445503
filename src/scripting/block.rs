use std::sync::Arc;

use super::ScriptEngine;

/// Evaluates one complete source block and returns its textual result.
///
/// Used by consumers outside the document chain, such as a fenced
/// code-block post-processor. On any failure - engine not ready or the
/// block raising an error - the original source comes back unchanged and
/// the failure is reported, never propagated.
///
/// The evaluator shares the engine's cache, so identical source evaluated
/// through either the inline path or this one is computed at most once.
pub struct BlockEvaluator {
    engine: Arc<ScriptEngine>,
}

impl BlockEvaluator {
    pub fn new(engine: Arc<ScriptEngine>) -> Self {
        Self { engine }
    }

    pub fn evaluate(&self, source: &str) -> String {
        if !self.engine.is_ready() {
            return source.to_string();
        }

        match self.engine.eval_cached(source, |raw| raw.trim().to_string()) {
            Ok(result) => result,
            Err(error) => {
                self.engine.notifier().notify(error.to_string());
                source.to_string()
            }
        }
    }
}
