//! Observability
//!
//! Diagnostic logging for loader and validator runs. Diagnostics go to
//! stderr so that stdout carries only results.

pub mod logging;

pub use logging::{LogFormat, init_logging};
