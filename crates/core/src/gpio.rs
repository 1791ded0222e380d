//! Digital input capability
//!
//! The monitor never talks to hardware directly. Hosts hand it an
//! implementation of [`DigitalInput`]; tests and the `--simulate` mode use
//! [`MockDigitalInput`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by a digital input backend
#[derive(Debug, Error)]
pub enum GpioError {
    #[error("pin {0} is not configured as an input")]
    NotConfigured(u32),

    #[error("I/O error on pin {pin}: {source}")]
    Io {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("pin {pin} returned unexpected value {value:?}")]
    InvalidValue { pin: u32, value: String },
}

/// Capability to configure and read boolean input pins
pub trait DigitalInput: Send + Sync {
    /// Prepare a pin for reading. Called once per pin while building.
    fn configure_as_input(&self, pin: u32) -> Result<(), GpioError>;

    /// Read the raw level of a pin (`true` = high)
    fn read(&self, pin: u32) -> Result<bool, GpioError>;
}

/// Shared handle to a digital input backend
pub type SharedDigitalInput = Arc<dyn DigitalInput>;

#[derive(Debug, Default)]
struct MockPins {
    levels: HashMap<u32, bool>,
    configured: HashSet<u32>,
    failing: HashSet<u32>,
}

/// In-memory digital input backend
///
/// Every configured pin starts low. Levels can be changed at any time
/// through a shared reference, which is how tests drive the monitor.
#[derive(Debug, Default)]
pub struct MockDigitalInput {
    pins: Mutex<MockPins>,
}

impl MockDigitalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw level a pin will read as
    pub fn set_level(&self, pin: u32, high: bool) {
        self.lock().levels.insert(pin, high);
    }

    /// Make reads of a pin fail until cleared
    pub fn set_failing(&self, pin: u32, failing: bool) {
        let mut pins = self.lock();
        if failing {
            pins.failing.insert(pin);
        } else {
            pins.failing.remove(&pin);
        }
    }

    pub fn is_configured(&self, pin: u32) -> bool {
        self.lock().configured.contains(&pin)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockPins> {
        // Recover from a poisoned mutex, the pin map is still usable
        self.pins.lock().unwrap_or_else(|poisoned| {
            log::warn!("Mock pin mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl DigitalInput for MockDigitalInput {
    fn configure_as_input(&self, pin: u32) -> Result<(), GpioError> {
        log::debug!("Configuring mock pin {} as input", pin);
        self.lock().configured.insert(pin);
        Ok(())
    }

    fn read(&self, pin: u32) -> Result<bool, GpioError> {
        let pins = self.lock();
        if !pins.configured.contains(&pin) {
            return Err(GpioError::NotConfigured(pin));
        }
        if pins.failing.contains(&pin) {
            return Err(GpioError::Io {
                pin,
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated read failure"),
            });
        }
        Ok(pins.levels.get(&pin).copied().unwrap_or(false))
    }
}
