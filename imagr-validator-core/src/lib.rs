//! `imagr-validator` core: configuration tree and rule engine
//!
//! This crate holds the generic [`node::Node`] tree that loaders produce and
//! the [`validation::Validator`] that checks an Imagr workflow configuration
//! against its rules. It performs no I/O.

pub mod error;
pub mod node;
pub mod validation;

pub use error::{NodeError, Rule, RuleViolation, ViolationKind};
pub use node::{Mapping, Node, NodeKind};
pub use validation::{
    ComponentKind, PasswordRule, ReportMode, ScriptRule, ValidationReport, Validator,
    ValidatorOptions,
};
