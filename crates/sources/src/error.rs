//! Error types for building and sampling sources

use std::path::PathBuf;
use switchwatch_core::GpioError;
use thiserror::Error;

/// A declaration that cannot be turned into a source
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("status type is not defined")]
    MissingType,

    #[error("unknown status type {0:?}")]
    UnknownType(String),

    #[error("{kind} status requires `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("pin must be a non-negative integer, got {0}")]
    InvalidPin(String),

    #[error("{which} is invalid: {reason}")]
    InvalidChild {
        which: &'static str,
        reason: Box<BuildError>,
    },

    #[error("{0} must be a digital status")]
    NotDigital(&'static str),

    #[error("both sides of the switch-over use pin {0}")]
    SamePin(u32),

    #[error("field list is empty")]
    EmptyFields,

    #[error("field name {0:?} is used more than once")]
    DuplicateField(String),

    #[error("field {field:?} needs percent_min < percent_max")]
    InvalidPercentRange { field: String },

    #[error("malformed declaration: {0}")]
    Malformed(String),

    #[error("failed to configure input: {0}")]
    Gpio(#[from] GpioError),
}

/// A JSON document that could not be read during a sample
#[derive(Debug, Error)]
pub enum SourceReadError {
    #[error("error reading file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("file {path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },
}
