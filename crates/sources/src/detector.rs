//! Field change detection
//!
//! Decides whether a fresh raw value of a field is a reportable change.
//! Percent fields are debounced on the percentage of their declared range,
//! numeric fields with a threshold on the absolute delta, and all other
//! fields simply follow their `report_on_change` flag.
//!
//! The anchors (`last_reported_value`, `last_reported_percent`) only move when
//! a change is accepted, so a slow drift made of many small steps is still
//! reported once it adds up to the threshold.

use crate::BuildError;
use serde_json::Value;
use switchwatch_core::{FieldDeclaration, DEFAULT_PERCENT_THRESHOLD};

/// Raw range mapped onto 0..100%, `max > min`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRange {
    min: f64,
    max: f64,
}

impl PercentRange {
    pub fn new(min: f64, max: f64) -> Option<Self> {
        // Also rejects NaN bounds
        if max > min {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn percent(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min) * 100.0
    }
}

/// Outcome of evaluating a new raw value
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Report the change and move the raw-value anchor
    ReportValue(Value),
    /// Report the change and move the percent anchor
    ReportPercent(f64),
    /// No anchor exists yet: record one without reporting
    BaselinePercent(f64),
    BaselineValue(Value),
    /// Below threshold, or a field that does not report
    Suppress,
}

impl Decision {
    pub fn is_report(&self) -> bool {
        matches!(self, Decision::ReportValue(_) | Decision::ReportPercent(_))
    }
}

/// One field of a field set, with its detector state
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Key looked up in the source document
    pub source_key: String,
    pub unit: String,
    pub report_on_change: bool,
    pub change_threshold: Option<f64>,
    pub percent: Option<PercentRange>,
    current_value: Option<Value>,
    last_reported_value: Option<Value>,
    last_reported_percent: Option<f64>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        source_key: impl Into<String>,
        initial: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            source_key: source_key.into(),
            unit: String::new(),
            report_on_change: false,
            change_threshold: None,
            percent: None,
            last_reported_value: initial.clone(),
            last_reported_percent: None,
            current_value: initial,
        }
    }

    pub fn from_declaration(decl: &FieldDeclaration) -> Result<Self, BuildError> {
        let name = decl.name.clone().ok_or(BuildError::MissingField {
            kind: "field",
            field: "name",
        })?;
        let key = decl.key.clone().ok_or(BuildError::MissingField {
            kind: "field",
            field: "key",
        })?;

        let mut spec = Self::new(name, key, decl.value.clone());
        spec.unit = decl.unit.clone();
        spec.report_on_change = decl.report_on_change;
        spec.change_threshold = decl.change_threshold;

        if decl.uses_percent {
            let range = match (decl.percent_min, decl.percent_max) {
                (Some(min), Some(max)) => PercentRange::new(min, max),
                _ => None,
            };
            let range = range.ok_or_else(|| BuildError::InvalidPercentRange {
                field: spec.name.clone(),
            })?;
            spec.set_percent_range(range);
        }

        Ok(spec)
    }

    /// Switch the field to percent mode, seeding the anchor from the current value
    pub fn set_percent_range(&mut self, range: PercentRange) {
        self.percent = Some(range);
        self.last_reported_percent = self.current_percent();
    }

    pub fn value(&self) -> Option<&Value> {
        self.current_value.as_ref()
    }

    pub fn last_reported_value(&self) -> Option<&Value> {
        self.last_reported_value.as_ref()
    }

    pub fn last_reported_percent(&self) -> Option<f64> {
        self.last_reported_percent
    }

    /// Percentage of the declared range the current value sits at
    pub fn current_percent(&self) -> Option<f64> {
        let range = self.percent?;
        let value = self.current_value.as_ref()?.as_f64()?;
        Some(range.percent(value))
    }

    /// Store a fresh raw reading and return whether it is a reportable change
    pub fn observe(&mut self, raw: Value) -> bool {
        if self
            .current_value
            .as_ref()
            .is_some_and(|current| same_reading(current, &raw))
        {
            log::trace!("Field {} not changed", self.name);
            return false;
        }

        let first_reading = self.current_value.is_none();
        self.current_value = Some(raw);

        if first_reading {
            // The first value ever seen becomes the baseline
            self.last_reported_value = self.current_value.clone();
            self.last_reported_percent = self.current_percent();
            log::debug!("Field {} initialised to {:?}", self.name, self.current_value);
            return false;
        }

        let decision = match &self.current_value {
            Some(value) => decide(self, value),
            None => Decision::Suppress,
        };
        self.apply(decision)
    }

    fn apply(&mut self, decision: Decision) -> bool {
        let reported = decision.is_report();
        match decision {
            Decision::ReportValue(value) => {
                log::debug!("Field {} changed to {} and reported", self.name, value);
                self.last_reported_value = Some(value);
            }
            Decision::ReportPercent(percent) => {
                log::debug!(
                    "Field {} changed percent to {:.2} and reported",
                    self.name,
                    percent
                );
                self.last_reported_percent = Some(percent);
            }
            Decision::BaselineValue(value) => {
                self.last_reported_value = Some(value);
            }
            Decision::BaselinePercent(percent) => {
                self.last_reported_percent = Some(percent);
            }
            Decision::Suppress => {
                log::debug!(
                    "Field {} changed to {:?} but not reported",
                    self.name,
                    self.current_value
                );
            }
        }
        reported
    }
}

/// Raw equality, except that numbers compare by value (`300` == `300.0`)
fn same_reading(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Decide whether `value` is a reportable change for `spec`. Pure.
pub fn decide(spec: &FieldSpec, value: &Value) -> Decision {
    if let Some(range) = spec.percent {
        let Some(raw) = value.as_f64() else {
            log::warn!("Percent field {} has non-numeric value {}", spec.name, value);
            return Decision::Suppress;
        };
        let percent = range.percent(raw);
        let threshold = spec.change_threshold.unwrap_or(DEFAULT_PERCENT_THRESHOLD);

        return match spec.last_reported_percent {
            None => Decision::BaselinePercent(percent),
            Some(anchor) if (percent - anchor).abs() >= threshold => {
                Decision::ReportPercent(percent)
            }
            Some(_) => Decision::Suppress,
        };
    }

    if let Some(threshold) = spec.change_threshold {
        let anchor = spec.last_reported_value.as_ref();
        match (value.as_f64(), anchor.and_then(Value::as_f64)) {
            (Some(new), Some(old)) => {
                return if (new - old).abs() >= threshold {
                    Decision::ReportValue(value.clone())
                } else {
                    Decision::Suppress
                };
            }
            (Some(_), None) if anchor.is_none() => {
                return Decision::BaselineValue(value.clone());
            }
            // Non-numeric values cannot be measured, fall back to the flag
            _ => {}
        }
    }

    if spec.report_on_change {
        Decision::ReportValue(value.clone())
    } else {
        Decision::Suppress
    }
}
