//! Component-level rules.
//!
//! Per component the order is fixed: `first_boot` type, `type` presence,
//! variant-specific structure, then the variants that may not run at first
//! boot.

use std::fmt;

use crate::error::{Rule, RuleViolation};
use crate::node::Node;

use super::options::ScriptRule;
use super::{Run, Step};

/// URL extensions accepted for `image` components.
pub const IMAGE_SUFFIXES: [&str; 2] = [".dmg", ".sparseimage"];

/// URL extensions accepted for `package` components.
pub const PACKAGE_SUFFIXES: [&str; 2] = [".dmg", ".pkg"];

/// Component variants selected by the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Restore a disk image.
    Image,
    /// Install a package.
    Package,
    /// Run a script.
    Script,
    /// Repartition the target disk.
    Partition,
    /// Erase the target volume.
    EraseVolume,
    /// Any other type; only the universal checks apply.
    Other,
}

impl ComponentKind {
    /// Maps a `type` value to its variant. Matching is case-sensitive.
    #[must_use]
    pub fn from_type(value: &str) -> Self {
        match value {
            "image" => Self::Image,
            "package" => Self::Package,
            "script" => Self::Script,
            "partition" => Self::Partition,
            "eraseVolume" => Self::EraseVolume,
            _ => Self::Other,
        }
    }

    /// Whether a component of this kind may set `first_boot: true`.
    #[must_use]
    pub const fn allows_first_boot(self) -> bool {
        !matches!(self, Self::Partition | Self::EraseVolume)
    }

    const fn article(self) -> &'static str {
        match self {
            Self::Image | Self::EraseVolume | Self::Other => "an",
            Self::Package | Self::Script | Self::Partition => "a",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Package => "package",
            Self::Script => "script",
            Self::Partition => "partition",
            Self::EraseVolume => "eraseVolume",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

impl Run<'_> {
    /// Validates the component at `index` of workflow `workflow`.
    pub(super) fn component(&mut self, workflow: &str, index: usize, component: &Node) -> Step {
        let position = index + 1;
        let violation =
            |rule, message: String| RuleViolation::in_workflow(rule, workflow, message);

        if !matches!(component, Node::Mapping(_)) {
            return self.flag(violation(
                Rule::ComponentShape,
                format!(
                    "Component {position} in workflow '{workflow}' must be a dictionary, found {}",
                    component.kind()
                ),
            ));
        }

        let first_boot = match component.get("first_boot").map(Node::as_bool) {
            None => false,
            Some(Ok(first_boot)) => first_boot,
            Some(Err(e)) => {
                self.flag(violation(
                    Rule::FirstBootType,
                    format!(
                        "Component {position} in workflow '{workflow}' has a first_boot value \
                         that is not a boolean: {e}"
                    ),
                ))?;
                false
            }
        };

        let kind = match component.get("type").map(Node::as_str) {
            None => {
                return self.flag(violation(
                    Rule::ComponentType,
                    format!("Component {position} in workflow '{workflow}' has no type"),
                ));
            }
            Some(Err(e)) => {
                return self.flag(violation(
                    Rule::FieldType,
                    format!("Component {position} in workflow '{workflow}' type must be a string: {e}"),
                ));
            }
            Some(Ok(value)) => ComponentKind::from_type(value),
        };

        match kind {
            ComponentKind::Image => self.url(
                workflow,
                component,
                kind,
                (Rule::ImageUrl, Rule::ImageUrlSuffix),
                &IMAGE_SUFFIXES,
            )?,
            ComponentKind::Package => self.url(
                workflow,
                component,
                kind,
                (Rule::PackageUrl, Rule::PackageUrlSuffix),
                &PACKAGE_SUFFIXES,
            )?,
            ComponentKind::Script => self.script(workflow, component)?,
            ComponentKind::Partition => self.partitions(workflow, component)?,
            ComponentKind::EraseVolume | ComponentKind::Other => {}
        }

        if first_boot && !kind.allows_first_boot() {
            let rule = if kind == ComponentKind::Partition {
                Rule::PartitionFirstBoot
            } else {
                Rule::EraseVolumeFirstBoot
            };
            self.flag(violation(
                rule,
                format!(
                    "Workflow '{workflow}' has {} {kind} component with first_boot set; \
                     {kind} components cannot run at first boot",
                    kind.article()
                ),
            ))?;
        }

        Ok(())
    }

    /// `url` must exist, be a string and end with one of `suffixes`.
    fn url(
        &mut self,
        workflow: &str,
        component: &Node,
        kind: ComponentKind,
        (missing, bad_suffix): (Rule, Rule),
        suffixes: &[&str],
    ) -> Step {
        let article = kind.article();
        let url = match component.get("url").map(Node::as_str) {
            None => {
                return self.flag(RuleViolation::in_workflow(
                    missing,
                    workflow,
                    format!("Workflow '{workflow}' has {article} {kind} component with no url"),
                ));
            }
            Some(Err(e)) => {
                return self.flag(RuleViolation::in_workflow(
                    Rule::FieldType,
                    workflow,
                    format!("Workflow '{workflow}' has {article} {kind} component whose url is not a string: {e}"),
                ));
            }
            Some(Ok(url)) => url,
        };

        if suffixes.iter().any(|suffix| url.ends_with(suffix)) {
            return Ok(());
        }
        self.flag(RuleViolation::in_workflow(
            bad_suffix,
            workflow,
            format!(
                "Workflow '{workflow}' has {article} {kind} component whose url '{url}' \
                 does not end in {}",
                suffixes.join(" or ")
            ),
        ))
    }

    fn script(&mut self, workflow: &str, component: &Node) -> Step {
        let has_content = component.contains_key("content");
        let (rule, satisfied, wanted) = match self.options.script_rule {
            ScriptRule::ContentOrUrl => (
                Rule::ScriptSource,
                has_content || component.contains_key("url"),
                "neither content nor a url",
            ),
            ScriptRule::ContentRequired => (Rule::ScriptContent, has_content, "no content"),
        };

        if satisfied {
            return Ok(());
        }
        self.flag(RuleViolation::in_workflow(
            rule,
            workflow,
            format!("Workflow '{workflow}' has a script component with {wanted}"),
        ))
    }

    /// Exactly one target partition, and a size on every partition.
    fn partitions(&mut self, workflow: &str, component: &Node) -> Step {
        let no_partitions = || {
            RuleViolation::in_workflow(
                Rule::Partitions,
                workflow,
                format!("Workflow '{workflow}' has a partition component with no partitions"),
            )
        };

        let partitions = match component.get("partitions").map(Node::as_sequence) {
            None | Some(Ok([])) => return self.flag(no_partitions()),
            Some(Err(_)) if component.get("partitions") == Some(&Node::Null) => {
                return self.flag(no_partitions());
            }
            Some(Err(e)) => {
                return self.flag(RuleViolation::in_workflow(
                    Rule::FieldType,
                    workflow,
                    format!("Workflow '{workflow}' has a partition component whose partitions are not an array: {e}"),
                ));
            }
            Some(Ok(partitions)) => partitions,
        };

        let targets = partitions
            .iter()
            .filter(|partition| partition.get("target").is_some_and(Node::is_true))
            .count();
        match targets {
            1 => {}
            0 => self.flag(RuleViolation::in_workflow(
                Rule::PartitionNoTarget,
                workflow,
                format!("Workflow '{workflow}' has a partition component with no target partition"),
            ))?,
            n => self.flag(RuleViolation::in_workflow(
                Rule::PartitionMultipleTargets,
                workflow,
                format!(
                    "Workflow '{workflow}' has a partition component with {n} target partitions; \
                     exactly one is allowed"
                ),
            ))?,
        }

        let sized = partitions
            .iter()
            .filter(|partition| partition.contains_key("size"))
            .count();
        if sized != partitions.len() {
            self.flag(RuleViolation::in_workflow(
                Rule::PartitionSize,
                workflow,
                format!(
                    "Workflow '{workflow}' has a partition component where only {sized} of {} \
                     partitions have a size",
                    partitions.len()
                ),
            ))?;
        }

        Ok(())
    }
}
