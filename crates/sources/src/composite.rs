//! Switch-over pair source
//!
//! Models an automatic transfer switch: a primary and a secondary power path,
//! each observed through its own digital input. Normally exactly one side is
//! live; the report collapses the pair into a single line.

use crate::{BuildError, DigitalStatus};
use switchwatch_core::{
    SampleOutcome, SharedDigitalInput, StatusDeclaration, StatusKind, StatusLine, StatusSource,
    INACTIVE_GLYPH,
};

/// A primary/secondary pair of digital inputs
#[derive(Debug)]
pub struct CompositeSwitchStatus {
    name: String,
    primary: DigitalStatus,
    secondary: DigitalStatus,
}

impl CompositeSwitchStatus {
    pub fn new(
        name: impl Into<String>,
        primary: DigitalStatus,
        secondary: DigitalStatus,
    ) -> Result<Self, BuildError> {
        if primary.pin() == secondary.pin() {
            return Err(BuildError::SamePin(primary.pin()));
        }
        Ok(Self {
            name: name.into(),
            primary,
            secondary,
        })
    }

    /// Build from a declaration whose `status1`/`status2` are digital declarations
    pub fn from_declaration(
        decl: &StatusDeclaration,
        gpio: &SharedDigitalInput,
    ) -> Result<Self, BuildError> {
        let status1 = decl.status1.as_deref().ok_or(BuildError::MissingField {
            kind: "composite",
            field: "status1",
        })?;
        let status2 = decl.status2.as_deref().ok_or(BuildError::MissingField {
            kind: "composite",
            field: "status2",
        })?;

        let primary = build_child("status1", status1, gpio)?;
        let secondary = build_child("status2", status2, gpio)?;

        let name = decl.name.clone().ok_or(BuildError::MissingField {
            kind: "composite",
            field: "name",
        })?;

        Self::new(name, primary, secondary)
    }

    pub fn primary(&self) -> &DigitalStatus {
        &self.primary
    }

    pub fn secondary(&self) -> &DigitalStatus {
        &self.secondary
    }

    /// The single report value for the pair
    pub fn summary(&self) -> String {
        let enabled: Vec<&str> = [&self.primary, &self.secondary]
            .into_iter()
            .filter(|side| side.fixed_value())
            .map(|side| side.display_name())
            .collect();

        match enabled.as_slice() {
            [] => INACTIVE_GLYPH.to_string(),
            [only] => (*only).to_string(),
            [first, second, ..] => {
                format!("{INACTIVE_GLYPH}*{first} & {second}*{INACTIVE_GLYPH}")
            }
        }
    }
}

/// Children default to digital when their declaration omits a type
fn build_child(
    which: &'static str,
    decl: &StatusDeclaration,
    gpio: &SharedDigitalInput,
) -> Result<DigitalStatus, BuildError> {
    match decl.status_kind() {
        None | Some(Ok(StatusKind::Digital)) => DigitalStatus::from_declaration(decl, gpio)
            .map_err(|e| BuildError::InvalidChild {
                which,
                reason: Box::new(e),
            }),
        Some(Ok(_)) => Err(BuildError::NotDigital(which)),
        Some(Err(raw)) => Err(BuildError::InvalidChild {
            which,
            reason: Box::new(BuildError::UnknownType(raw)),
        }),
    }
}

impl StatusSource for CompositeSwitchStatus {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn sample(&mut self) -> SampleOutcome {
        let mut outcome = self.primary.sample();
        outcome.merge(self.secondary.sample());

        if outcome.changed {
            outcome.triggered_by.push(self.name.clone());
        }
        outcome
    }

    fn render_lines(&self) -> Vec<StatusLine> {
        vec![StatusLine::new(self.name.clone(), self.summary())]
    }
}
