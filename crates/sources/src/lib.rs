//! switchwatch-sources: Status source implementations for switchwatch.
//!
//! Three kinds of source exist: a single digital input, a switch-over pair
//! of digital inputs, and a set of fields read from a JSON document. They are
//! gathered in the closed [`StatusNode`] type and built from declarations.

mod composite;
mod detector;
mod digital;
mod error;
mod fieldset;
mod node;

pub use composite::CompositeSwitchStatus;
pub use detector::{decide, Decision, FieldSpec, PercentRange};
pub use digital::DigitalStatus;
pub use error::{BuildError, SourceReadError};
pub use fieldset::{display_value, FieldSetStatus};
pub use node::StatusNode;
