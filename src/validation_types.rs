use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity reported by the schema-validation service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
    #[serde(other)]
    Other,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaLocation {
    #[serde(default, rename = "loadingURI")]
    pub loading_uri: String,
    #[serde(default)]
    pub pointer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceLocation {
    #[serde(default)]
    pub pointer: String,
}

/// One structured finding from the remote schema check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaValidationMessage {
    #[serde(default)]
    pub level: Severity,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub schema: SchemaLocation,
    #[serde(default)]
    pub instance: InstanceLocation,
}

impl fmt::Display for SchemaValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance.pointer.is_empty() {
            "/"
        } else {
            self.instance.pointer.as_str()
        };
        write!(f, "[{}] {} at {}: {}", self.level.as_str(), self.keyword, location, self.message)
    }
}

/// Normalized diagnostics.
///
/// Empty sequences mean "no problems found", never "not checked yet";
/// see [`ValidationState`] for the in-progress case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub schema_validation_messages: Vec<SchemaValidationMessage>,
}

impl ValidationResult {
    /// A result carrying a single client-side message
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            schema_validation_messages: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty() && self.schema_validation_messages.is_empty()
    }

    pub fn count_by_level(&self, level: Severity) -> usize {
        self.schema_validation_messages
            .iter()
            .filter(|m| m.level == level)
            .count()
    }
}

/// Where the diagnostics for the current load stand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationState {
    #[default]
    NotRequested,
    Pending,
    Complete(ValidationResult),
    /// The remote check failed; no remote diagnostics exist for this load
    Unavailable { reason: String },
}

impl ValidationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Complete(result) => Some(result),
            _ => None,
        }
    }
}
