//! Status source trait and related types

/// What one sampling step observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    /// Whether the change is worth reporting
    pub changed: bool,
    /// Names of the sources responsible for the change, innermost first
    pub triggered_by: Vec<String>,
}

impl SampleOutcome {
    /// Nothing worth reporting happened
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// A single named source reported a change
    pub fn triggered(name: impl Into<String>) -> Self {
        Self {
            changed: true,
            triggered_by: vec![name.into()],
        }
    }

    /// Fold another outcome into this one: flags are OR-ed, names concatenated
    pub fn merge(&mut self, other: SampleOutcome) {
        self.changed |= other.changed;
        self.triggered_by.extend(other.triggered_by);
    }
}

/// One `name: value` line of a source's textual status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub name: String,
    pub value: String,
}

impl StatusLine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Trait for all status sources
///
/// A status source observes one piece of the outside world (a pin, a pair of
/// pins, a JSON document) and decides on every sample whether what it saw is
/// a reportable change.
pub trait StatusSource: Send + Sync {
    /// Display name, if the source has one
    fn name(&self) -> Option<&str>;

    /// Read the underlying input and update internal state.
    ///
    /// Never fails: read errors are logged and reported as "no change".
    fn sample(&mut self) -> SampleOutcome;

    /// Current state as report lines
    fn render_lines(&self) -> Vec<StatusLine>;
}
