//! Registry of status sources
//!
//! Built once at startup from the declarative description. Construction is
//! best effort: each declaration is built on its own, and one that cannot be
//! built is recorded by name instead of aborting the whole registry.

use super::report;
use serde_json::Value;
use switchwatch_core::{SampleOutcome, SharedDigitalInput, StatusDeclaration, StatusSource};
use switchwatch_sources::{BuildError, StatusNode};

/// Placeholder shown for a failed declaration that had no name
pub const UNNAMED: &str = "(unnamed)";

/// Sources sharing a group label, in declaration order
#[derive(Debug)]
pub struct StatusGroup {
    label: String,
    members: Vec<StatusNode>,
}

impl StatusGroup {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            members: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn members(&self) -> &[StatusNode] {
        &self.members
    }
}

/// A declaration that could not be built
#[derive(Debug)]
pub struct FailedSource {
    pub name: Option<String>,
    pub reason: BuildError,
}

impl FailedSource {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }
}

/// The status tree: ordered groups of sources plus the failed declarations
#[derive(Debug, Default)]
pub struct Registry {
    groups: Vec<StatusGroup>,
    failed: Vec<FailedSource>,
}

impl Registry {
    /// Build from typed declarations
    pub fn build(description: &[StatusDeclaration], gpio: &SharedDigitalInput) -> Self {
        let mut registry = Self::default();
        for decl in description {
            registry.add_declaration(decl, gpio);
        }
        registry.log_summary();
        registry
    }

    /// Build from raw JSON entries, tolerating entries that do not even parse
    pub fn from_values(description: &[Value], gpio: &SharedDigitalInput) -> Self {
        let mut registry = Self::default();
        for entry in description {
            match serde_json::from_value::<StatusDeclaration>(entry.clone()) {
                Ok(decl) => registry.add_declaration(&decl, gpio),
                Err(e) => {
                    let name = entry.get("name").and_then(Value::as_str).map(str::to_string);
                    registry.record_failure(name, BuildError::Malformed(e.to_string()));
                }
            }
        }
        registry.log_summary();
        registry
    }

    fn add_declaration(&mut self, decl: &StatusDeclaration, gpio: &SharedDigitalInput) {
        match StatusNode::build(decl, gpio) {
            Ok(node) => {
                log::debug!(
                    "Created {} status {:?} in group {}",
                    node.kind(),
                    node.name(),
                    decl.group_label()
                );
                self.group_mut(decl.group_label()).members.push(node);
            }
            Err(e) => self.record_failure(decl.name.clone(), e),
        }
    }

    fn record_failure(&mut self, name: Option<String>, reason: BuildError) {
        log::warn!(
            "Failed to create status {}: {}",
            name.as_deref().unwrap_or(UNNAMED),
            reason
        );
        self.failed.push(FailedSource { name, reason });
    }

    /// Group by label, created on first use
    fn group_mut(&mut self, label: &str) -> &mut StatusGroup {
        let index = match self.groups.iter().position(|group| group.label == label) {
            Some(index) => index,
            None => {
                self.groups.push(StatusGroup::new(label));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    fn log_summary(&self) {
        log::info!(
            "Registry built: {} sources in {} groups, {} failed",
            self.node_count(),
            self.groups.len(),
            self.failed.len()
        );
    }

    pub fn groups(&self) -> &[StatusGroup] {
        &self.groups
    }

    pub fn group(&self, label: &str) -> Option<&StatusGroup> {
        self.groups.iter().find(|group| group.label == label)
    }

    pub fn failed(&self) -> &[FailedSource] {
        &self.failed
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(FailedSource::display_name).collect()
    }

    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|group| group.members.len()).sum()
    }

    /// Find a top-level source by name
    pub fn find(&self, name: &str) -> Option<&StatusNode> {
        self.groups
            .iter()
            .flat_map(|group| group.members.iter())
            .find(|node| node.name() == Some(name))
    }

    /// Sample every source, groups in order then members in order
    pub fn sample_all(&mut self) -> SampleOutcome {
        let mut outcome = SampleOutcome::unchanged();
        for group in &mut self.groups {
            for node in &mut group.members {
                outcome.merge(node.sample());
            }
        }
        outcome
    }

    /// Render the status block, see [`report::render`]
    pub fn render_report(&self, triggered_by: &[String]) -> String {
        report::render(self, triggered_by)
    }
}
