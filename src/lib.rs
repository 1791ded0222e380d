//! switchwatch: power switch-over and sensor status monitor
//!
//! This library provides the monitoring core of switchwatch:
//! - A registry that builds the status tree from a declarative description
//! - A poller that samples every source and notifies on reportable changes
//! - Report rendering for chat or terminal output
//! - Configuration and the file-backed digital input used by the binary

pub mod config;
pub mod core;
pub mod gpio;
pub mod notify;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::{Poller, PollerState, Registry, StatusGroup, StatusHandle};
pub use switchwatch_core::{ChangeNotice, DigitalInput, Notifier, SampleOutcome, StatusSource};
pub use switchwatch_sources::StatusNode;
pub use switchwatch_types::{FieldDeclaration, StatusDeclaration};
