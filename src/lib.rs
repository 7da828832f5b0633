//! `imagr-validator` - Imagr workflow configuration validator
//!
//! Loads Imagr configurations from disk or over HTTP(S), parses XML or
//! binary property lists (or YAML), and checks them with the rule engine
//! in [`imagr_validator_core`].

pub mod cli;
pub mod error;
pub mod loader;
pub mod observability;
