use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Text encoding of an uploaded specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// `.yaml`/`.yml` means YAML, anything else is read as JSON. No content sniffing.
    pub fn from_file_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which contract the document declares through its version marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecDialect {
    /// `openapi: 3.x`
    OpenApi,
    /// `swagger: "2.0"`
    Swagger,
}

impl SpecDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenApi => "openapi",
            Self::Swagger => "swagger",
        }
    }
}

/// A parsed OpenAPI/Swagger document.
///
/// The tree is kept as a generic value with insertion-ordered mappings so
/// that every field the tool does not edit survives serialization as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecDocument(Value);

impl SpecDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn dialect(&self) -> Option<SpecDialect> {
        if self.0.get("openapi").and_then(scalar_text).is_some() {
            Some(SpecDialect::OpenApi)
        } else if self.0.get("swagger").and_then(scalar_text).is_some() {
            Some(SpecDialect::Swagger)
        } else {
            None
        }
    }

    /// Value of the `openapi` or `swagger` marker, rendered as text
    pub fn dialect_version(&self) -> Option<String> {
        let key = self.dialect()?.as_str();
        self.0.get(key).and_then(scalar_text)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("info")?.get("title")?.as_str()
    }

    /// `info.version`; YAML may hand numbers here (`version: 1.0`), so they are rendered as text
    pub fn info_version(&self) -> Option<String> {
        self.0.get("info")?.get("version").and_then(scalar_text)
    }

    /// Number of method entries across all `paths`
    pub fn operation_count(&self) -> usize {
        const METHODS: [&str; 8] = [
            "get", "put", "post", "delete", "options", "head", "patch", "trace",
        ];

        self.0
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| {
                paths
                    .values()
                    .filter_map(Value::as_object)
                    .map(|item| item.keys().filter(|k| METHODS.contains(&k.as_str())).count())
                    .sum()
            })
            .unwrap_or(0)
    }
}

impl From<Value> for SpecDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
