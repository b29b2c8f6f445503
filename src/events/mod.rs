//! Status channel - non-fatal processing failures surface as events.
//!
//! Unresolved references, malformed markers, evaluation failures, and
//! initialization failures are reported here instead of aborting the
//! document. The transport is pluggable: the UI owns the sink, tests
//! usually collect events through [`Notifier::channel`].

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

/// A human-readable report of a non-fatal failure, with an optional
/// originating error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    message: String,
    cause: Option<String>,
}

impl StatusEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {cause}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Cloneable handle that delivers [`StatusEvent`]s to a pluggable sink.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn Fn(StatusEvent) + Send + Sync>,
}

impl Notifier {
    /// Deliver events to the given closure.
    pub fn sink(deliver: impl Fn(StatusEvent) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(deliver),
        }
    }

    /// Drop every event; events are still traced.
    pub fn silent() -> Self {
        Self::sink(|_| {})
    }

    /// Deliver events into an mpsc channel, returning the receiving end.
    pub fn channel() -> (Self, Receiver<StatusEvent>) {
        let (tx, rx) = mpsc::channel();
        let notifier = Self::sink(move |event| {
            let _ = tx.send(event);
        });

        (notifier, rx)
    }

    pub fn notify(&self, message: impl Into<String>) {
        self.send(StatusEvent::new(message));
    }

    pub fn notify_with(&self, message: impl Into<String>, cause: impl fmt::Display) {
        self.send(StatusEvent::with_cause(message, cause));
    }

    pub fn send(&self, event: StatusEvent) {
        tracing::debug!(status = %event, "status event");
        (self.sink)(event);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Notifier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_events_in_order() {
        let (notifier, events) = Notifier::channel();

        notifier.notify("first");
        notifier.notify_with("second", "cause");

        assert_eq!(events.recv().unwrap(), StatusEvent::new("first"));
        let event = events.recv().unwrap();
        assert_eq!(event.message(), "second");
        assert_eq!(event.cause(), Some("cause"));
    }

    #[test]
    fn test_display_appends_cause() {
        let event = StatusEvent::with_cause("broke", "why");
        assert_eq!(event.to_string(), "broke: why");
        assert_eq!(StatusEvent::new("plain").to_string(), "plain");
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (notifier, events) = Notifier::channel();
        drop(events);
        notifier.notify("nobody listening");
    }
}
