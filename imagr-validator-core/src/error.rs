//! Core error types for `imagr-validator`
//!
//! Tree access errors and the rule violations produced by the validator.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::node::NodeKind;

// ============================================================================
// Tree Access Errors
// ============================================================================

/// Error returned by the strict [`Node`](crate::node::Node) accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The node holds a different variant than the one requested.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// Variant the caller asked for
        expected: NodeKind,
        /// Variant actually present
        found: NodeKind,
    },
}

// ============================================================================
// Violation Categories
// ============================================================================

/// Category of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A required field is absent (or present but empty).
    MissingRequiredField,
    /// A field holds the wrong kind of value.
    WrongType,
    /// A field holds a value outside its fixed enumeration.
    InvalidEnumerationValue,
    /// A URL does not end with an accepted extension.
    InvalidSuffix,
    /// A workflow name appears more than once.
    DuplicateName,
    /// A collection that must have entries is missing or empty.
    EmptyRequiredCollection,
    /// A reference names a workflow that does not exist.
    CrossReferenceNotFound,
    /// Two settings that must not be combined are combined.
    IncompatibleCombination,
    /// A count constraint on a collection is violated.
    CardinalityViolation,
}

impl ViolationKind {
    /// Stable kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing-required-field",
            Self::WrongType => "wrong-type",
            Self::InvalidEnumerationValue => "invalid-enumeration-value",
            Self::InvalidSuffix => "invalid-suffix",
            Self::DuplicateName => "duplicate-name",
            Self::EmptyRequiredCollection => "empty-required-collection",
            Self::CrossReferenceNotFound => "cross-reference-not-found",
            Self::IncompatibleCombination => "incompatible-combination",
            Self::CardinalityViolation => "cardinality-violation",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Identifier of the rule that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// The root of the document is a dictionary.
    RootType,
    /// `password` is present (legacy rule).
    PasswordRequired,
    /// `password`, when present, is not empty.
    PasswordNotEmpty,
    /// `password` is a string.
    PasswordType,
    /// `workflows` exists and has entries.
    WorkflowsPresent,
    /// `workflows` is an array.
    WorkflowsType,
    /// Each workflow is a dictionary.
    WorkflowType,
    /// Each workflow has a string `name`.
    WorkflowName,
    /// Workflow names are unique.
    WorkflowNameUnique,
    /// `restart_action` is `none`, `restart` or `shutdown`.
    RestartAction,
    /// Each workflow has a `components` array.
    WorkflowComponents,
    /// Each component is a dictionary.
    ComponentShape,
    /// `first_boot` is a boolean.
    FirstBootType,
    /// Each component has a string `type`.
    ComponentType,
    /// Image components have a `url`.
    ImageUrl,
    /// Image URLs end in `.dmg` or `.sparseimage`.
    ImageUrlSuffix,
    /// Package components have a `url`.
    PackageUrl,
    /// Package URLs end in `.dmg` or `.pkg`.
    PackageUrlSuffix,
    /// Script components have `content` or `url`.
    ScriptSource,
    /// Script components have `content` (legacy rule).
    ScriptContent,
    /// Partition components have a non-empty `partitions` array.
    Partitions,
    /// Exactly one partition is the target: none is marked.
    PartitionNoTarget,
    /// Exactly one partition is the target: more than one is marked.
    PartitionMultipleTargets,
    /// Every partition carries a `size`.
    PartitionSize,
    /// Partition components never run at first boot.
    PartitionFirstBoot,
    /// `eraseVolume` components never run at first boot.
    EraseVolumeFirstBoot,
    /// `default_workflow` names an existing workflow.
    DefaultWorkflowReference,
    /// `autorun` names an existing workflow.
    AutorunReference,
    /// Cross-reference fields are strings.
    ReferenceType,
    /// A string-valued field holds something else.
    FieldType,
}

impl Rule {
    /// Stable kebab-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RootType => "root-type",
            Self::PasswordRequired => "password-required",
            Self::PasswordNotEmpty => "password-not-empty",
            Self::PasswordType => "password-type",
            Self::WorkflowsPresent => "workflows-present",
            Self::WorkflowsType => "workflows-type",
            Self::WorkflowType => "workflow-type",
            Self::WorkflowName => "workflow-name",
            Self::WorkflowNameUnique => "workflow-name-unique",
            Self::RestartAction => "restart-action",
            Self::WorkflowComponents => "workflow-components",
            Self::ComponentShape => "component-shape",
            Self::FirstBootType => "first-boot-type",
            Self::ComponentType => "component-type",
            Self::ImageUrl => "image-url",
            Self::ImageUrlSuffix => "image-url-suffix",
            Self::PackageUrl => "package-url",
            Self::PackageUrlSuffix => "package-url-suffix",
            Self::ScriptSource => "script-source",
            Self::ScriptContent => "script-content",
            Self::Partitions => "partitions",
            Self::PartitionNoTarget => "partition-no-target",
            Self::PartitionMultipleTargets => "partition-multiple-targets",
            Self::PartitionSize => "partition-size",
            Self::PartitionFirstBoot => "partition-first-boot",
            Self::EraseVolumeFirstBoot => "erase-volume-first-boot",
            Self::DefaultWorkflowReference => "default-workflow-reference",
            Self::AutorunReference => "autorun-reference",
            Self::ReferenceType => "reference-type",
            Self::FieldType => "field-type",
        }
    }

    /// The category this rule reports under.
    #[must_use]
    pub const fn kind(self) -> ViolationKind {
        match self {
            Self::PasswordRequired
            | Self::PasswordNotEmpty
            | Self::WorkflowName
            | Self::WorkflowComponents
            | Self::ComponentType
            | Self::ImageUrl
            | Self::PackageUrl
            | Self::ScriptSource
            | Self::ScriptContent => ViolationKind::MissingRequiredField,
            Self::RootType
            | Self::PasswordType
            | Self::WorkflowsType
            | Self::WorkflowType
            | Self::ComponentShape
            | Self::FirstBootType
            | Self::ReferenceType
            | Self::FieldType => ViolationKind::WrongType,
            Self::RestartAction => ViolationKind::InvalidEnumerationValue,
            Self::ImageUrlSuffix | Self::PackageUrlSuffix => ViolationKind::InvalidSuffix,
            Self::WorkflowNameUnique => ViolationKind::DuplicateName,
            Self::WorkflowsPresent | Self::Partitions => ViolationKind::EmptyRequiredCollection,
            Self::DefaultWorkflowReference | Self::AutorunReference => {
                ViolationKind::CrossReferenceNotFound
            }
            Self::PartitionFirstBoot | Self::EraseVolumeFirstBoot => {
                ViolationKind::IncompatibleCombination
            }
            Self::PartitionNoTarget | Self::PartitionMultipleTargets | Self::PartitionSize => {
                ViolationKind::CardinalityViolation
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Violations
// ============================================================================

/// A single rule violation.
///
/// `Display` renders only the human-readable message; the rule and kind are
/// available as fields for structured output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct RuleViolation {
    /// Rule that failed
    pub rule: Rule,
    /// Category of the rule
    pub kind: ViolationKind,
    /// Human-readable description
    pub message: String,
    /// Owning workflow, when the violation is inside one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
}

impl RuleViolation {
    /// Creates a document-level violation.
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            kind: rule.kind(),
            message: message.into(),
            workflow: None,
        }
    }

    /// Creates a violation attributed to `workflow`.
    pub fn in_workflow(rule: Rule, workflow: &str, message: impl Into<String>) -> Self {
        Self {
            workflow: Some(workflow.to_string()),
            ..Self::new(rule, message)
        }
    }
}
