//! switchwatch-core: Core traits and capabilities for the switchwatch monitor.
//!
//! This crate contains the seams the rest of the workspace plugs into: the
//! StatusSource trait, the digital-input capability, the change notifier,
//! and shared constants.

pub mod constants;
mod gpio;
mod notifier;
mod status_source;

pub use constants::{
    ACTIVE_GLYPH, DEFAULT_PERCENT_THRESHOLD, DEFAULT_POLL_INTERVAL, INACTIVE_GLYPH,
    NAME_COLUMN_WIDTH, REPORT_FENCE,
};
pub use gpio::{DigitalInput, GpioError, MockDigitalInput, SharedDigitalInput};
pub use notifier::{ChangeNotice, Notifier};
pub use status_source::{SampleOutcome, StatusLine, StatusSource};

// Re-export types used in construction signatures for convenience
pub use switchwatch_types::{FieldDeclaration, StatusDeclaration, StatusKind};
