//! Scripting module - the shared Rhai evaluator behind the inline
//! expression and block evaluation paths.
//!
//! One engine instance serves the whole session: evaluation is
//! synchronous and serialized, results are memoized in a bounded cache,
//! and nothing may be evaluated until the bootstrap script has run.

mod block;
mod engine;

pub use block::BlockEvaluator;
pub use engine::{Readiness, ScriptEngine, ScriptError, WORKING_DIRECTORY_KEY};
