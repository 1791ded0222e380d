//! Single digital input source

use crate::BuildError;
use serde_json::Value;
use std::fmt;
use switchwatch_core::{
    SampleOutcome, SharedDigitalInput, StatusDeclaration, StatusLine, StatusSource, ACTIVE_GLYPH,
    INACTIVE_GLYPH,
};

/// A boolean input pin
pub struct DigitalStatus {
    name: String,
    pin: u32,
    /// Last raw level read from the pin
    current: bool,
    active_high: bool,
    report_on_change: bool,
    gpio: SharedDigitalInput,
}

impl DigitalStatus {
    pub fn new(
        name: impl Into<String>,
        pin: u32,
        initial: bool,
        active_high: bool,
        report_on_change: bool,
        gpio: SharedDigitalInput,
    ) -> Self {
        Self {
            name: name.into(),
            pin,
            current: initial,
            active_high,
            report_on_change,
            gpio,
        }
    }

    /// Build from a declaration, configuring the pin as an input
    pub fn from_declaration(
        decl: &StatusDeclaration,
        gpio: &SharedDigitalInput,
    ) -> Result<Self, BuildError> {
        let pin = match &decl.pin {
            None => {
                return Err(BuildError::MissingField {
                    kind: "digital",
                    field: "pin",
                })
            }
            Some(value) => parse_pin(value)?,
        };

        let name = decl.name.clone().ok_or(BuildError::MissingField {
            kind: "digital",
            field: "name",
        })?;

        gpio.configure_as_input(pin)?;
        log::debug!("Configured pin {} for digital status {}", pin, name);

        Ok(Self::new(
            name,
            pin,
            decl.initial,
            decl.active_high,
            decl.report_on_change,
            gpio.clone(),
        ))
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Raw level as last read
    pub fn raw_value(&self) -> bool {
        self.current
    }

    /// Logical state: `true` when the input is engaged
    pub fn fixed_value(&self) -> bool {
        if self.active_high {
            self.current
        } else {
            !self.current
        }
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }
}

fn parse_pin(value: &Value) -> Result<u32, BuildError> {
    value
        .as_u64()
        .and_then(|pin| u32::try_from(pin).ok())
        .ok_or_else(|| BuildError::InvalidPin(value.to_string()))
}

impl StatusSource for DigitalStatus {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn sample(&mut self) -> SampleOutcome {
        let next = match self.gpio.read(self.pin) {
            Ok(level) => level,
            Err(e) => {
                log::warn!("Failed to read pin {} for {}: {}", self.pin, self.name, e);
                return SampleOutcome::unchanged();
            }
        };

        if next == self.current {
            return SampleOutcome::unchanged();
        }

        self.current = next;
        if self.report_on_change {
            log::debug!("{} changed to {} and reported", self.name, next);
            SampleOutcome::triggered(self.name.clone())
        } else {
            log::debug!("{} changed to {} but not reported", self.name, next);
            SampleOutcome::unchanged()
        }
    }

    fn render_lines(&self) -> Vec<StatusLine> {
        let glyph = if self.fixed_value() {
            ACTIVE_GLYPH
        } else {
            INACTIVE_GLYPH
        };
        vec![StatusLine::new(self.name.clone(), glyph)]
    }
}

impl fmt::Debug for DigitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalStatus")
            .field("name", &self.name)
            .field("pin", &self.pin)
            .field("current", &self.current)
            .field("active_high", &self.active_high)
            .field("report_on_change", &self.report_on_change)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use switchwatch_core::MockDigitalInput;

    fn mock() -> (Arc<MockDigitalInput>, SharedDigitalInput) {
        let gpio = Arc::new(MockDigitalInput::new());
        let shared: SharedDigitalInput = gpio.clone();
        (gpio, shared)
    }

    #[test]
    fn test_from_declaration_configures_pin() {
        let (gpio, shared) = mock();
        let status =
            DigitalStatus::from_declaration(&StatusDeclaration::digital("Main", 17), &shared)
                .unwrap();

        assert_eq!(status.pin(), 17);
        assert!(gpio.is_configured(17));
    }

    #[test]
    fn test_missing_or_invalid_pin() {
        let (gpio, shared) = mock();

        let mut decl = StatusDeclaration::digital("Main", 17);
        decl.pin = None;
        assert!(matches!(
            DigitalStatus::from_declaration(&decl, &shared),
            Err(BuildError::MissingField { field: "pin", .. })
        ));

        decl.pin = Some(Value::from("17"));
        assert!(matches!(
            DigitalStatus::from_declaration(&decl, &shared),
            Err(BuildError::InvalidPin(_))
        ));

        decl.pin = Some(Value::from(-3));
        assert!(matches!(
            DigitalStatus::from_declaration(&decl, &shared),
            Err(BuildError::InvalidPin(_))
        ));
        assert!(!gpio.is_configured(17));
    }

    #[test]
    fn test_missing_name() {
        let (_gpio, shared) = mock();
        let mut decl = StatusDeclaration::digital("Main", 17);
        decl.name = None;
        assert!(matches!(
            DigitalStatus::from_declaration(&decl, &shared),
            Err(BuildError::MissingField { field: "name", .. })
        ));
    }

    #[test]
    fn test_reported_change() {
        let (gpio, shared) = mock();
        let mut status =
            DigitalStatus::from_declaration(&StatusDeclaration::digital("Main", 17), &shared)
                .unwrap();

        assert_eq!(status.sample(), SampleOutcome::unchanged());

        gpio.set_level(17, true);
        assert_eq!(status.sample(), SampleOutcome::triggered("Main"));
        assert!(status.fixed_value());

        // Same level again is not a change
        assert_eq!(status.sample(), SampleOutcome::unchanged());
    }

    #[test]
    fn test_silent_change_still_updates_value() {
        let (gpio, shared) = mock();
        let mut decl = StatusDeclaration::digital("Generator", 5);
        decl.report_on_change = false;
        let mut status = DigitalStatus::from_declaration(&decl, &shared).unwrap();

        gpio.set_level(5, true);
        let outcome = status.sample();

        assert!(!outcome.changed);
        assert!(outcome.triggered_by.is_empty());
        assert!(status.raw_value());
        assert!(status.fixed_value());
    }

    #[test]
    fn test_active_low_inverts() {
        let (gpio, shared) = mock();
        let mut decl = StatusDeclaration::digital("Battery", 6);
        decl.active_high = false;
        let mut status = DigitalStatus::from_declaration(&decl, &shared).unwrap();

        assert!(status.fixed_value());
        assert_eq!(status.render_lines(), vec![StatusLine::new("Battery", ACTIVE_GLYPH)]);

        gpio.set_level(6, true);
        status.sample();
        assert!(!status.fixed_value());
        assert_eq!(status.render_lines(), vec![StatusLine::new("Battery", INACTIVE_GLYPH)]);
    }

    #[test]
    fn test_read_failure_is_skipped() {
        let (gpio, shared) = mock();
        let mut status =
            DigitalStatus::from_declaration(&StatusDeclaration::digital("Main", 17), &shared)
                .unwrap();

        gpio.set_level(17, true);
        gpio.set_failing(17, true);
        assert_eq!(status.sample(), SampleOutcome::unchanged());
        assert!(!status.raw_value());

        gpio.set_failing(17, false);
        assert!(status.sample().changed);
    }
}
