//! Declarative description of the status tree
//!
//! A description is an ordered list of declarations. Each declaration names
//! a kind (`digital`, `composite` or `fieldset`), the group it belongs to, and
//! the kind-specific keys. Every key is optional at this layer: validation
//! happens when the declaration is built, so that one bad entry never stops
//! the rest of the description from loading.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Group label used when a declaration has no `group` key
pub const DEFAULT_GROUP: &str = "Status";

/// Kind of status source a declaration describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A single digital input pin
    Digital,
    /// A normal/standby switch-over pair of digital inputs
    Composite,
    /// Numeric/text fields read from an external JSON document
    FieldSet,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Digital => "digital",
            StatusKind::Composite => "composite",
            StatusKind::FieldSet => "fieldset",
        }
    }
}

impl FromStr for StatusKind {
    type Err = String;

    /// Parse a kind name, accepting the legacy names (`gpio`, `ats`, `json`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "digital" | "gpio" => Ok(StatusKind::Digital),
            "composite" | "ats" => Ok(StatusKind::Composite),
            "fieldset" | "json" => Ok(StatusKind::FieldSet),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the declarative description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusDeclaration {
    /// Kind name, see [`StatusKind`]
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Group label; `None` places the source in [`DEFAULT_GROUP`]
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub name: Option<String>,

    // Digital
    /// Pin number, kept raw so a non-integer can be reported as such
    #[serde(default, alias = "gpio_port")]
    pub pin: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub initial: bool,
    /// A raw high reading means "engaged"
    #[serde(default, alias = "gpio_hight_mode", deserialize_with = "deserialize_flag")]
    pub active_high: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub report_on_change: bool,

    // Composite
    #[serde(default)]
    pub status1: Option<Box<StatusDeclaration>>,
    #[serde(default)]
    pub status2: Option<Box<StatusDeclaration>>,

    // Field set
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldDeclaration>>,
}

impl StatusDeclaration {
    /// Parse the kind name, `Err` carries the raw name when it is unknown
    pub fn status_kind(&self) -> Option<Result<StatusKind, String>> {
        self.kind.as_deref().map(StatusKind::from_str)
    }

    /// Group label, falling back to [`DEFAULT_GROUP`]
    pub fn group_label(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    /// Declaration of a single digital input
    pub fn digital(name: impl Into<String>, pin: u32) -> Self {
        Self {
            kind: Some(StatusKind::Digital.as_str().to_string()),
            name: Some(name.into()),
            pin: Some(Value::from(pin)),
            active_high: true,
            report_on_change: true,
            ..Self::default()
        }
    }

    /// Declaration of a switch-over pair
    pub fn composite(
        name: impl Into<String>,
        primary: StatusDeclaration,
        secondary: StatusDeclaration,
    ) -> Self {
        Self {
            kind: Some(StatusKind::Composite.as_str().to_string()),
            name: Some(name.into()),
            status1: Some(Box::new(primary)),
            status2: Some(Box::new(secondary)),
            ..Self::default()
        }
    }

    /// Declaration of a JSON-backed field set
    pub fn fieldset(file_path: impl Into<String>, fields: Vec<FieldDeclaration>) -> Self {
        Self {
            kind: Some(StatusKind::FieldSet.as_str().to_string()),
            file_path: Some(file_path.into()),
            fields: Some(fields),
            ..Self::default()
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// One field of a field-set declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Display name, unique within its field set
    #[serde(default)]
    pub name: Option<String>,
    /// Key looked up in the external document
    #[serde(default, alias = "field")]
    pub key: Option<String>,
    /// Initial value, shown until the first successful read
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_unit")]
    pub unit: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub report_on_change: bool,
    /// Minimum delta (raw, or percentage points) before a change is reported
    #[serde(default, alias = "report_on_change_value")]
    pub change_threshold: Option<f64>,
    #[serde(default, alias = "have_percent", deserialize_with = "deserialize_flag")]
    pub uses_percent: bool,
    #[serde(default)]
    pub percent_min: Option<f64>,
    #[serde(default)]
    pub percent_max: Option<f64>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.change_threshold = Some(threshold);
        self
    }

    pub fn with_percent(mut self, min: f64, max: f64) -> Self {
        self.uses_percent = true;
        self.percent_min = Some(min);
        self.percent_max = Some(max);
        self
    }

    pub fn reporting(mut self) -> Self {
        self.report_on_change = true;
        self
    }
}

/// Deserialize a boolean flag that legacy files sometimes write as 0/1 or null
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Value::Null => false,
        other => {
            log::debug!("Treating non-scalar flag value {} as false", other);
            false
        }
    })
}

/// Units are free text; a null unit renders as nothing
fn deserialize_unit<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
