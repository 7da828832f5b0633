//! Configuration-level rules: password, workflow presence, cross-references.

use std::collections::HashSet;

use crate::error::{Rule, RuleViolation};
use crate::node::Node;

use super::options::PasswordRule;
use super::{Halt, Run, Step};

impl Run<'_> {
    /// Validates the whole document.
    pub(super) fn configuration(&mut self, root: &Node) -> Step {
        if !matches!(root, Node::Mapping(_)) {
            return self.flag(RuleViolation::new(
                Rule::RootType,
                format!("Configuration must be a dictionary, found {}", root.kind()),
            ));
        }

        // Zero workflows is reported ahead of anything else in the document.
        let workflows = self.workflows(root)?;
        self.password(root)?;
        let Some(workflows) = workflows else {
            return Ok(());
        };

        let names = self.workflow_names(workflows)?;
        for (workflow, name) in workflows.iter().zip(&names) {
            if let Some(name) = name {
                self.workflow(name, workflow)?;
            }
        }

        let known: HashSet<&str> = names.iter().flatten().copied().collect();
        self.reference(root, "default_workflow", Rule::DefaultWorkflowReference, &known)?;
        self.reference(root, "autorun", Rule::AutorunReference, &known)
    }

    fn password(&mut self, root: &Node) -> Step {
        let Some(password) = root.get("password") else {
            if self.options.password_rule == PasswordRule::Required {
                return self.flag(RuleViolation::new(
                    Rule::PasswordRequired,
                    "No password is set",
                ));
            }
            return Ok(());
        };

        match password.as_str() {
            Err(e) => self.flag(RuleViolation::new(
                Rule::PasswordType,
                format!("password must be a string: {e}"),
            )),
            Ok("") if self.options.password_rule == PasswordRule::NonEmptyIfPresent => self.flag(
                RuleViolation::new(Rule::PasswordNotEmpty, "password is set but empty"),
            ),
            Ok(_) => Ok(()),
        }
    }

    /// Returns the workflow list, or `None` if it is unusable (and flagged).
    fn workflows<'n>(&mut self, root: &'n Node) -> Result<Option<&'n [Node]>, Halt> {
        let missing = || RuleViolation::new(Rule::WorkflowsPresent, "No workflows are defined");

        let node = match root.get("workflows") {
            None | Some(Node::Null) => {
                self.flag(missing())?;
                return Ok(None);
            }
            Some(node) => node,
        };

        match node.as_sequence() {
            Ok([]) => {
                self.flag(missing())?;
                Ok(None)
            }
            Ok(workflows) => Ok(Some(workflows)),
            Err(e) => {
                self.flag(RuleViolation::new(
                    Rule::WorkflowsType,
                    format!("workflows must be an array: {e}"),
                ))?;
                Ok(None)
            }
        }
    }

    /// Checks that `key`, when present, names a known workflow.
    fn reference(&mut self, root: &Node, key: &str, rule: Rule, known: &HashSet<&str>) -> Step {
        let Some(node) = root.get(key) else {
            return Ok(());
        };

        match node.as_str() {
            Err(e) => self.flag(RuleViolation::new(
                Rule::ReferenceType,
                format!("{key} must be a string: {e}"),
            )),
            Ok(name) if !known.contains(name) => self.flag(RuleViolation::new(
                rule,
                format!("{key} '{name}' does not match the name of any workflow"),
            )),
            Ok(_) => Ok(()),
        }
    }
}
