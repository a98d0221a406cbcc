//! Event sink trait and implementations.

use parking_lot::{Mutex, RwLock};
use std::io::Write;
use tracing::{debug, error, info, Level};

use super::event::{RunEvent, Severity};

/// Receives run events.
///
/// Emitting must never fail the run; sinks swallow their own errors.
pub trait EventSink: Send + Sync {
    /// Emits an event.
    fn emit(&self, event: &RunEvent);
}

/// A no-op event sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event: &RunEvent) {
        // Intentionally empty - discards all events
    }
}

/// An event sink that logs events using the tracing framework.
///
/// Error events are always logged at `ERROR`; everything else at the
/// configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl EventSink for LoggingEventSink {
    fn emit(&self, event: &RunEvent) {
        let event_type = event.event_type();
        let data = event.to_value();
        if event.severity() == Severity::Error {
            error!(event_type = %event_type, event_data = %data, "Event: {}", event_type);
        } else if self.level == Level::DEBUG {
            debug!(event_type = %event_type, event_data = %data, "Event: {}", event_type);
        } else {
            info!(event_type = %event_type, event_data = %data, "Event: {}", event_type);
        }
    }
}

/// Writes user-facing messages to a terminal or any writer.
pub struct ConsoleEventSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleEventSink<W> {
    /// Creates a console sink over `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl ConsoleEventSink<std::io::Stdout> {
    /// Creates a sink that prints to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> EventSink for ConsoleEventSink<W> {
    fn emit(&self, event: &RunEvent) {
        let prefix = match event.severity() {
            Severity::Info => "",
            Severity::Success => "✔ ",
            Severity::Error => "Error: ",
        };
        let mut out = self.out.lock();
        if let Err(err) = writeln!(out, "{prefix}{}", event.message()) {
            debug!(error = %err, "Console sink write failed");
        }
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<RunEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events whose type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<RunEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type().starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Returns only error-severity events.
    #[must_use]
    pub fn errors(&self) -> Vec<RunEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.severity() == Severity::Error)
            .cloned()
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: &RunEvent) {
        self.events.write().push(event.clone());
    }
}

/// Forwards every event to several sinks.
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<std::sync::Arc<dyn EventSink>>,
}

impl FanoutEventSink {
    /// Creates an empty fanout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    #[must_use]
    pub fn with(mut self, sink: std::sync::Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EventSink for FanoutEventSink {
    fn emit(&self, event: &RunEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
