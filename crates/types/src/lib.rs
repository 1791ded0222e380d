//! switchwatch-types: Shared data types for the switchwatch status monitor.
//!
//! This crate contains the pure serde types that describe which status
//! sources to build. They carry no I/O and no GPIO dependencies, making
//! them suitable as a foundation layer for the other crates.

pub mod description;

// Re-export commonly used types at the crate root for convenience
pub use description::{
    deserialize_flag, FieldDeclaration, StatusDeclaration, StatusKind, DEFAULT_GROUP,
};
