//! Rule engine for Imagr workflow configurations.
//!
//! Rules run in a fixed order: configuration-level checks, workflow names,
//! each workflow and its components in document order, then the
//! `default_workflow`/`autorun` cross-references. By default the first
//! violation ends the run; [`ReportMode::CollectAll`] keeps walking and
//! returns every violation in the same order.
//!
//! The engine never mutates the tree and performs no I/O.

mod component;
mod configuration;
pub mod options;
mod workflow;

pub use component::ComponentKind;
pub use options::{PasswordRule, ReportMode, ScriptRule, ValidatorOptions};

use crate::error::RuleViolation;
use crate::node::Node;

// ============================================================================
// Public API
// ============================================================================

/// Outcome of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Violations in the order they were found. At most one in fail-fast
    /// mode.
    pub violations: Vec<RuleViolation>,
}

impl ValidationReport {
    /// Returns `true` if no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The first violation found, if any.
    #[must_use]
    pub fn first(&self) -> Option<&RuleViolation> {
        self.violations.first()
    }

    /// Converts into the fail-fast result shape.
    ///
    /// # Errors
    ///
    /// Returns the first violation if there is one.
    pub fn into_result(self) -> Result<(), RuleViolation> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// Configuration validator.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a validator with the given options.
    #[must_use]
    pub const fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Validates `root`, stopping at the first violation regardless of the
    /// configured [`ReportMode`].
    ///
    /// # Errors
    ///
    /// Returns the first rule violation in document order.
    pub fn validate(&self, root: &Node) -> Result<(), RuleViolation> {
        self.run(root, ReportMode::FailFast).into_result()
    }

    /// Validates `root` and returns every violation.
    #[must_use]
    pub fn validate_all(&self, root: &Node) -> Vec<RuleViolation> {
        self.run(root, ReportMode::CollectAll).violations
    }

    /// Validates `root` using the configured [`ReportMode`].
    #[must_use]
    pub fn report(&self, root: &Node) -> ValidationReport {
        self.run(root, self.options.mode)
    }

    fn run(&self, root: &Node, mode: ReportMode) -> ValidationReport {
        let mut run = Run {
            options: &self.options,
            mode,
            violations: Vec::new(),
        };
        // A halted run has already recorded the violation that stopped it.
        let _ = run.configuration(root);
        ValidationReport {
            violations: run.violations,
        }
    }
}

// ============================================================================
// Run State
// ============================================================================

/// Signals that a fail-fast run has stopped.
#[derive(Debug)]
struct Halt;

/// Result of one rule step. `Err` only in fail-fast mode.
type Step = Result<(), Halt>;

/// State for a single validation run.
struct Run<'a> {
    options: &'a ValidatorOptions,
    mode: ReportMode,
    violations: Vec<RuleViolation>,
}

impl Run<'_> {
    /// Records a violation. Halts the run in fail-fast mode.
    fn flag(&mut self, violation: RuleViolation) -> Step {
        tracing::debug!(
            rule = violation.rule.as_str(),
            workflow = violation.workflow.as_deref().unwrap_or("<none>"),
            "{}",
            violation.message
        );
        self.violations.push(violation);
        match self.mode {
            ReportMode::FailFast => Err(Halt),
            ReportMode::CollectAll => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
