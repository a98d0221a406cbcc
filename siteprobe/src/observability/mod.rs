//! Observability utilities.

mod logging;

pub use logging::{build_filter, init_tracing, LogFormat, DEFAULT_FILTER};
