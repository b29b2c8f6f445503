//! The document processing chain.
//!
//! A document flows through an ordered sequence of text-transform stages,
//! each taking the previous stage's output. The chain's entry point
//! contains every stage failure: on error the original text passes
//! through unmodified and a status event is reported, so one bad
//! expression never blanks or stalls the rendered output.
//!
//! Callers resolve the definitions map (see
//! [`crate::definitions::InterpolatingMap::interpolate`]) before building
//! a context; the chain consumes the resolved entries.

pub mod text;

mod context;
mod inline;
mod variable;

pub use context::ProcessorContext;
pub use inline::InlineScriptProcessor;
pub use variable::{ScriptVariableProcessor, VariableProcessor};

use thiserror::Error;

use crate::definitions::InterpolationError;
use crate::events::Notifier;
use crate::scripting::ScriptError;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// One text-transform stage: pass through, modify, or fail.
pub trait Processor: Send + Sync {
    fn apply(&self, text: &str) -> Result<String, ProcessorError>;
}

/// An ordered pipeline of stages, assembled once at session setup.
pub struct ProcessorChain {
    stages: Vec<Box<dyn Processor>>,
    notifier: Notifier,
}

impl ProcessorChain {
    pub fn new(stages: Vec<Box<dyn Processor>>, notifier: Notifier) -> Self {
        Self { stages, notifier }
    }

    /// The standard scripting pipeline: rename definition keys into
    /// member syntax, then evaluate inline expressions. Building the
    /// inline stage runs the one-time bootstrap.
    pub fn scripting(context: &ProcessorContext) -> Self {
        Self::new(
            vec![
                Box::new(ScriptVariableProcessor::new(context)),
                Box::new(InlineScriptProcessor::new(context)),
            ],
            context.notifier().clone(),
        )
    }

    /// The plain pipeline for documents that do not route variables
    /// through the scripting engine: substitute definition values
    /// directly.
    pub fn variables(context: &ProcessorContext) -> Self {
        Self::new(
            vec![Box::new(VariableProcessor::new(context))],
            context.notifier().clone(),
        )
    }

    /// Boundary containment: run every stage in order; any error is
    /// reported and the original text passes through unmodified.
    pub fn process(&self, text: &str) -> String {
        match self.apply(text) {
            Ok(processed) => processed,
            Err(error) => {
                tracing::warn!(%error, "processing failed, passing text through");
                self.notifier
                    .notify_with("document processing failed, text left unmodified", &error);
                text.to_string()
            }
        }
    }
}

impl Processor for ProcessorChain {
    fn apply(&self, text: &str) -> Result<String, ProcessorError> {
        let mut current = text.to_string();

        for stage in &self.stages {
            current = stage.apply(&current)?;
        }

        Ok(current)
    }
}
