//! Run events and the sinks that receive them.
//!
//! Progress notices and user-visible errors are plain values handed to an
//! [`EventSink`]; the interactive layer decides how to render them.

mod event;
mod sink;

pub use event::{RunEvent, Severity};
pub use sink::{
    CollectingEventSink, ConsoleEventSink, EventSink, FanoutEventSink, LoggingEventSink,
    NoOpEventSink,
};
