//! JSON-backed field set source
//!
//! Reads a small JSON document (typically written by an inverter or battery
//! monitor daemon) and tracks a declared subset of its top-level keys.

use crate::{BuildError, FieldSpec, SourceReadError};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use switchwatch_core::{SampleOutcome, StatusDeclaration, StatusLine, StatusSource};

/// Fields extracted from one external JSON document
#[derive(Debug)]
pub struct FieldSetStatus {
    name: Option<String>,
    source_path: PathBuf,
    fields: Vec<FieldSpec>,
}

impl FieldSetStatus {
    pub fn new(source_path: impl Into<PathBuf>, fields: Vec<FieldSpec>) -> Result<Self, BuildError> {
        if fields.is_empty() {
            return Err(BuildError::EmptyFields);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(BuildError::DuplicateField(field.name.clone()));
            }
        }

        Ok(Self {
            name: None,
            source_path: source_path.into(),
            fields,
        })
    }

    pub fn from_declaration(decl: &StatusDeclaration) -> Result<Self, BuildError> {
        let declared = decl.fields.as_ref().ok_or(BuildError::MissingField {
            kind: "fieldset",
            field: "fields",
        })?;
        let path = decl.file_path.as_ref().ok_or(BuildError::MissingField {
            kind: "fieldset",
            field: "file_path",
        })?;

        let fields = declared
            .iter()
            .map(FieldSpec::from_declaration)
            .collect::<Result<Vec<_>, _>>()?;

        let mut status = Self::new(path, fields)?;
        status.name = decl.name.clone();
        Ok(status)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Read and parse the whole document; the file is closed before returning
    fn read_document(&self) -> Result<Map<String, Value>, SourceReadError> {
        let content =
            std::fs::read_to_string(&self.source_path).map_err(|source| SourceReadError::Io {
                path: self.source_path.clone(),
                source,
            })?;

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SourceReadError::NotAnObject {
                path: self.source_path.clone(),
            }),
            Err(source) => Err(SourceReadError::Parse {
                path: self.source_path.clone(),
                source,
            }),
        }
    }
}

impl StatusSource for FieldSetStatus {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn sample(&mut self) -> SampleOutcome {
        let document = match self.read_document() {
            Ok(document) => document,
            Err(e) => {
                log::error!("{}", e);
                return SampleOutcome::unchanged();
            }
        };

        let mut outcome = SampleOutcome::unchanged();
        for field in &mut self.fields {
            let Some(raw) = document.get(&field.source_key) else {
                log::error!(
                    "Field {} not found in file {}",
                    field.source_key,
                    self.source_path.display()
                );
                continue;
            };

            if field.observe(raw.clone()) {
                outcome.changed = true;
                outcome.triggered_by.push(field.name.clone());
            }
        }
        outcome
    }

    fn render_lines(&self) -> Vec<StatusLine> {
        self.fields
            .iter()
            .map(|field| {
                let value = match field.value() {
                    Some(value) => display_value(value),
                    None => "n/a".to_string(),
                };
                let text = match field.current_percent() {
                    Some(percent) => format!("{}{} (~{:.2}%)", value, field.unit, percent),
                    None => format!("{}{}", value, field.unit),
                };
                StatusLine::new(field.name.clone(), text)
            })
            .collect()
    }
}

/// Render a JSON scalar the way a person would write it: strings unquoted
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
