//! Command-line interface
//!
//! Argument parsing and command handlers for the `imagr-validator` binary.

pub mod args;
pub mod commands;
