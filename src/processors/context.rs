use std::sync::Arc;

use crate::config::Workspace;
use crate::definitions::InterpolatingMap;
use crate::events::Notifier;
use crate::scripting::ScriptEngine;
use crate::sigils::ScriptSigilOperator;

/// Everything a processing chain needs for one document session: the
/// resolved definitions, the workspace preferences, the engine handle,
/// and the status channel.
///
/// The context owns the session's single [`ScriptEngine`]; clones of the
/// handle (see [`ProcessorContext::engine`]) share the same evaluator and
/// cache, so work routed through any path is computed at most once.
pub struct ProcessorContext {
    definitions: Arc<InterpolatingMap>,
    workspace: Workspace,
    engine: Arc<ScriptEngine>,
    notifier: Notifier,
}

impl ProcessorContext {
    /// `definitions` should already be interpolated; the chain performs
    /// only non-recursive substitution passes over the document.
    pub fn new(definitions: Arc<InterpolatingMap>, workspace: Workspace, notifier: Notifier) -> Self {
        let engine = Arc::new(ScriptEngine::new(notifier.clone()));

        Self {
            definitions,
            workspace,
            engine,
            notifier,
        }
    }

    pub fn definitions(&self) -> &InterpolatingMap {
        &self.definitions
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn engine(&self) -> Arc<ScriptEngine> {
        Arc::clone(&self.engine)
    }

    /// Operator that turns a wrapped document key into a complete inline
    /// expression, for hosts that inject variable references into the
    /// editor.
    pub fn script_operator(&self) -> ScriptSigilOperator {
        ScriptSigilOperator::new(
            self.workspace.script_sigils.clone(),
            self.definitions.operator().clone(),
        )
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
