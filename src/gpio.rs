//! File-backed digital input
//!
//! Reads pin levels from sysfs-style value files
//! (`<root>/gpio<N>/value` containing `0` or `1`). Exporting the pins and
//! setting their direction is left to the host's boot scripts.

use std::path::{Path, PathBuf};
use switchwatch_core::{DigitalInput, GpioError};

#[derive(Debug, Clone)]
pub struct FileDigitalInput {
    root: PathBuf,
}

impl FileDigitalInput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{}", pin)).join("value")
    }
}

impl DigitalInput for FileDigitalInput {
    fn configure_as_input(&self, pin: u32) -> Result<(), GpioError> {
        let path = self.value_path(pin);
        std::fs::metadata(&path).map_err(|source| GpioError::Io { pin, source })?;
        log::debug!("Pin {} readable at {}", pin, path.display());
        Ok(())
    }

    fn read(&self, pin: u32) -> Result<bool, GpioError> {
        let content = std::fs::read_to_string(self.value_path(pin))
            .map_err(|source| GpioError::Io { pin, source })?;

        match content.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(GpioError::InvalidValue {
                pin,
                value: other.to_string(),
            }),
        }
    }
}
