//! Workflow-level rules: names, uniqueness, restart action, components.

use std::collections::HashSet;

use crate::error::{Rule, RuleViolation};
use crate::node::Node;

use super::{Halt, Run, Step};

/// Accepted values of `restart_action`.
pub const RESTART_ACTIONS: [&str; 3] = ["none", "restart", "shutdown"];

impl Run<'_> {
    /// Reads every workflow name in document order, failing on the first
    /// duplicate. Entries are `None` for workflows whose name could not be
    /// read; those have already been flagged.
    ///
    /// All names are checked before any workflow body, so a duplicate is
    /// always reported ahead of component problems in either workflow.
    pub(super) fn workflow_names<'n>(
        &mut self,
        workflows: &'n [Node],
    ) -> Result<Vec<Option<&'n str>>, Halt> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(workflows.len());

        for (index, workflow) in workflows.iter().enumerate() {
            let position = index + 1;

            if !matches!(workflow, Node::Mapping(_)) {
                self.flag(RuleViolation::new(
                    Rule::WorkflowType,
                    format!(
                        "Workflow {position} must be a dictionary, found {}",
                        workflow.kind()
                    ),
                ))?;
                names.push(None);
                continue;
            }

            let name = match workflow.get("name").map(Node::as_str) {
                None => {
                    self.flag(RuleViolation::new(
                        Rule::WorkflowName,
                        format!("Workflow {position} has no name"),
                    ))?;
                    None
                }
                Some(Err(e)) => {
                    self.flag(RuleViolation::new(
                        Rule::FieldType,
                        format!("Workflow {position} name must be a string: {e}"),
                    ))?;
                    None
                }
                Some(Ok(name)) => Some(name),
            };

            if let Some(name) = name {
                if !seen.insert(name) {
                    self.flag(RuleViolation::in_workflow(
                        Rule::WorkflowNameUnique,
                        name,
                        format!("Workflow name '{name}' is used more than once"),
                    ))?;
                }
            }
            names.push(name);
        }

        Ok(names)
    }

    /// Validates one workflow body and each of its components.
    pub(super) fn workflow(&mut self, name: &str, workflow: &Node) -> Step {
        tracing::debug!(workflow = name, "validating workflow");

        if let Some(action) = workflow.get("restart_action") {
            match action.as_str() {
                Ok(action) if RESTART_ACTIONS.contains(&action) => {}
                Ok(action) => self.flag(RuleViolation::in_workflow(
                    Rule::RestartAction,
                    name,
                    format!(
                        "Workflow '{name}' has restart_action '{action}'; expected one of {}",
                        RESTART_ACTIONS.join(", ")
                    ),
                ))?,
                Err(_) => self.flag(RuleViolation::in_workflow(
                    Rule::RestartAction,
                    name,
                    format!(
                        "Workflow '{name}' has a {} restart_action; expected one of {}",
                        action.kind(),
                        RESTART_ACTIONS.join(", ")
                    ),
                ))?,
            }
        }

        let components = match workflow.get("components") {
            None | Some(Node::Null) => {
                return self.flag(RuleViolation::in_workflow(
                    Rule::WorkflowComponents,
                    name,
                    format!("Workflow '{name}' has no components"),
                ));
            }
            Some(node) => match node.as_sequence() {
                Ok(components) => components,
                Err(e) => {
                    return self.flag(RuleViolation::in_workflow(
                        Rule::FieldType,
                        name,
                        format!("Workflow '{name}' components must be an array: {e}"),
                    ));
                }
            },
        };

        for (index, component) in components.iter().enumerate() {
            self.component(name, index, component)?;
        }
        Ok(())
    }
}
