use std::path::Path;

use parking_lot::Mutex;
use rhai::{Dynamic, Engine, Scope};
use thiserror::Error;

use crate::collections::BoundedCache;
use crate::events::Notifier;
use crate::processors::text;
use crate::sigils::{ScriptKeyOperator, escape};

/// Maximum number of memoized evaluation results.
const CACHE_CAPACITY: usize = 512;

/// Maximum characters of source quoted in a failure report.
const SNIPPET_LENGTH: usize = 50;

/// Definition key under which the working directory is bound.
pub const WORKING_DIRECTORY_KEY: &str = "application.script.working.directory";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script evaluation failed near `{snippet}`: {message}")]
    Evaluation { snippet: String, message: String },
}

/// Bootstrap lifecycle of the engine.
///
/// Consumers must check this before evaluating: while the engine is not
/// [`Readiness::Ready`], inline expressions stay literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No bootstrap attempt has been made yet.
    Uninitialized,
    /// The bootstrap script evaluated cleanly.
    Ready,
    /// The bootstrap script raised an error; stays failed until a later
    /// successful initialization.
    Failed,
}

struct EngineState {
    scope: Scope<'static>,
    cache: BoundedCache<String, String>,
    readiness: Readiness,
}

/// Owns the single scripting-engine instance for a session.
///
/// Evaluation is synchronous and non-reentrant, so every path - cached,
/// uncached, bootstrap - serializes through one lock. The lock also makes
/// the cache's check-then-insert atomic: a not-yet-cached expression is
/// evaluated at most once even under concurrent lookups, which matters
/// because expressions may carry side effects.
pub struct ScriptEngine {
    engine: Engine,
    state: Mutex<EngineState>,
    notifier: Notifier,
}

impl ScriptEngine {
    pub fn new(notifier: Notifier) -> Self {
        let mut engine = Engine::new();

        // A runaway expression terminates with an engine error instead of
        // blocking the calling thread forever.
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        Self {
            engine,
            state: Mutex::new(EngineState {
                scope: Scope::new(),
                cache: BoundedCache::new(CACHE_CAPACITY),
                readiness: Readiness::Uninitialized,
            }),
            notifier,
        }
    }

    /// Register a native function, for hosts that expose helpers to
    /// scripts.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn readiness(&self) -> Readiness {
        self.state.lock().readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == Readiness::Ready
    }

    /// Empty the evaluation cache. Cached results implicitly depend on
    /// the bindings active at evaluation time, so this must run whenever
    /// the bootstrap script or the definitions are reloaded.
    pub fn clear(&self) {
        self.state.lock().cache.clear();
    }

    /// Evaluate `source` and stringify the result; on failure, report a
    /// status event and return an empty string.
    pub fn eval(&self, source: &str) -> String {
        match self.try_eval(source) {
            Ok(result) => result,
            Err(error) => {
                self.notifier.notify(error.to_string());
                String::new()
            }
        }
    }

    /// Evaluate `source` without touching the cache.
    pub fn try_eval(&self, source: &str) -> Result<String, ScriptError> {
        let mut state = self.state.lock();
        self.eval_locked(&mut state, source)
    }

    /// Cache-checked evaluation keyed by the verbatim source text.
    ///
    /// On a miss the raw result is passed through `post` before it is
    /// stored and returned; on a hit the stored value comes back without
    /// re-evaluating or re-applying `post`. Failed evaluations are not
    /// cached.
    pub fn eval_cached(
        &self,
        source: &str,
        post: impl FnOnce(&str) -> String,
    ) -> Result<String, ScriptError> {
        let mut state = self.state.lock();

        if let Some(hit) = state.cache.get(source) {
            return Ok(hit.clone());
        }

        let raw = self.eval_locked(&mut state, source)?;
        let processed = post(&raw);
        state.cache.insert(source.to_string(), processed.clone());

        Ok(processed)
    }

    /// Run the bootstrap script, substituting the resolved definitions
    /// (key-renamed, value-escaped) and the working directory into the
    /// script text first. A blank script is trivially ready.
    ///
    /// Re-invoking is allowed and rebinds; each attempt empties the
    /// evaluation cache since cached results depend on the old bindings.
    pub fn bootstrap(
        &self,
        script: &str,
        working_directory: &Path,
        definitions: &[(String, String)],
    ) -> Readiness {
        let mut state = self.state.lock();
        state.cache.clear();

        if script.trim().is_empty() {
            state.readiness = Readiness::Ready;
            return state.readiness;
        }

        let bound = bind(script, working_directory, definitions);

        state.readiness = match self.eval_locked(&mut state, &bound) {
            Ok(_) => Readiness::Ready,
            Err(error) => {
                tracing::warn!(%error, "bootstrap script failed");
                self.notifier
                    .notify_with("bootstrap script failed to evaluate", &error);
                Readiness::Failed
            }
        };

        state.readiness
    }

    fn eval_locked(&self, state: &mut EngineState, source: &str) -> Result<String, ScriptError> {
        match self
            .engine
            .eval_with_scope::<Dynamic>(&mut state.scope, source)
        {
            Ok(value) => Ok(stringify(value)),
            Err(error) => Err(ScriptError::Evaluation {
                snippet: snippet(source),
                message: error.to_string(),
            }),
        }
    }
}

/// Substitute the renamed, escaped definitions and the working directory
/// into the bootstrap script text in one pass.
fn bind(script: &str, working_directory: &Path, definitions: &[(String, String)]) -> String {
    let renamer = ScriptKeyOperator::new();
    let directory = working_directory.to_string_lossy().replace('\\', "/");

    let mut keys = Vec::with_capacity(definitions.len() + 1);
    let mut values = Vec::with_capacity(definitions.len() + 1);

    for (key, value) in definitions {
        keys.push(renamer.apply(key));
        values.push(escape(value));
    }

    keys.push(renamer.apply(WORKING_DIRECTORY_KEY));
    values.push(escape(&directory));

    text::replace(script, &keys, &values)
}

fn stringify(value: Dynamic) -> String {
    if value.is::<()>() {
        String::new()
    } else {
        value.to_string()
    }
}

fn snippet(source: &str) -> String {
    source.chars().take(SNIPPET_LENGTH).collect()
}
