//! Testing utilities.
//!
//! This module provides:
//! - Search and analysis providers that never touch the network
//! - A pacer that records rate-limit pauses instead of sleeping
//! - Sample analysis documents

pub mod fixtures;
mod mocks;

pub use mocks::{RecordingPacer, ScriptedAnalysisProvider, StaticSearchProvider};
