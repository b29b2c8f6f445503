//! Variable interpolation and inline script evaluation for plain-text
//! documents.
//!
//! A document may reference user-defined values with sigil-delimited
//! tokens such as `{{project.title}}`. This crate resolves those
//! references recursively, rebinds the resolved values into a scripting
//! engine, and evaluates inline script expressions embedded in the text:
//!
//! - [`definitions::InterpolatingMap`] - recursive reference resolution
//! - [`sigils`] - delimiter pairs and key-name transcoding
//! - [`processors`] - the ordered document transformation chain
//! - [`scripting::ScriptEngine`] - the shared script evaluator and cache
//! - [`events`] - the status channel for non-fatal failures

pub mod collections;
pub mod config;
pub mod definitions;
pub mod events;
pub mod processors;
pub mod scripting;
pub mod sigils;

pub use config::Workspace;
pub use definitions::InterpolatingMap;
pub use events::{Notifier, StatusEvent};
pub use processors::{ProcessorChain, ProcessorContext};
pub use scripting::ScriptEngine;
