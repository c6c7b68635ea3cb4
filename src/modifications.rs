use crate::document::{scalar_text, SpecDocument};
use crate::error::ModificationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// User-selected edits. Every field is independent; an unset field is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationConfig {
    /// Replaces `info.version` when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub apply_time_object_fix: bool,
}

impl ModificationConfig {
    /// Defaults for a freshly loaded document: its own version, no fixes
    pub fn for_document(document: &SpecDocument) -> Self {
        Self {
            version: document.info_version(),
            apply_time_object_fix: false,
        }
    }

    /// The override version, if one is set and non-empty
    pub fn effective_version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    pub fn version_label(&self) -> &str {
        self.effective_version().unwrap_or("Not set")
    }

    pub fn time_fix_label(&self) -> &'static str {
        if self.apply_time_object_fix {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

/// One named structural edit.
///
/// Implementations must be idempotent: applying twice with the same
/// configuration gives the same document as applying once.
pub trait Transformation {
    fn name(&self) -> &'static str;

    fn is_enabled(&self, config: &ModificationConfig) -> bool;

    fn apply(&self, document: &mut Value, config: &ModificationConfig) -> Result<(), ModificationError>;
}

/// Sets `info.version` from the configuration
pub struct VersionOverride;

impl Transformation for VersionOverride {
    fn name(&self) -> &'static str {
        "version override"
    }

    fn is_enabled(&self, config: &ModificationConfig) -> bool {
        config.effective_version().is_some()
    }

    fn apply(&self, document: &mut Value, config: &ModificationConfig) -> Result<(), ModificationError> {
        let Some(version) = config.effective_version() else {
            return Ok(());
        };

        match document.get_mut("info").and_then(Value::as_object_mut) {
            // Same text already there; a YAML number such as `1.0` keeps its type
            Some(info) if info.get("version").and_then(scalar_text).as_deref() == Some(version) => {}
            Some(info) => {
                info.insert("version".to_string(), Value::String(version.to_string()));
                debug!(version, "Set info.version");
            }
            None => warn!("No 'info' object in document; version override skipped"),
        }
        Ok(())
    }
}

/// Declares `Time.hour` and `Time.minute` as 32-bit integers
pub struct TimeObjectFix;

impl TimeObjectFix {
    const SCHEMA_POINTER: &'static str = "/components/schemas/Time";
    const PROPERTIES: [&'static str; 2] = ["hour", "minute"];
}

impl Transformation for TimeObjectFix {
    fn name(&self) -> &'static str {
        "time object fix"
    }

    fn is_enabled(&self, config: &ModificationConfig) -> bool {
        config.apply_time_object_fix
    }

    fn apply(&self, document: &mut Value, _config: &ModificationConfig) -> Result<(), ModificationError> {
        let Some(time_schema) = document
            .pointer_mut(Self::SCHEMA_POINTER)
            .and_then(Value::as_object_mut)
        else {
            warn!("'Time' schema not found in components/schemas");
            return Ok(());
        };

        let Some(properties) = time_schema
            .get_mut("properties")
            .and_then(Value::as_object_mut)
        else {
            warn!("'Time' schema has no properties defined");
            return Ok(());
        };

        for property in Self::PROPERTIES {
            match properties.get_mut(property) {
                None | Some(Value::Null) => {
                    warn!("Time.{} property not found in 'Time' schema", property);
                }
                Some(Value::Object(attributes)) => {
                    merge_integer_type(attributes);
                    info!("Modified Time.{} to type: 'integer', format: 'int32'", property);
                }
                Some(other) => {
                    return Err(ModificationError::NotAMapping {
                        pointer: format!("{}/properties/{}", Self::SCHEMA_POINTER, property),
                        found: kind_of(other),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Overwrites `type`/`format`, leaving every other attribute where it was
fn merge_integer_type(attributes: &mut Map<String, Value>) {
    attributes.insert("type".to_string(), Value::String("integer".to_string()));
    attributes.insert("format".to_string(), Value::String("int32".to_string()));
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Transformations in execution order
fn pipeline() -> [&'static dyn Transformation; 2] {
    [&VersionOverride, &TimeObjectFix]
}

/// Applies the configured edits to a deep copy of `original`.
///
/// `original` is never touched. On failure no partially edited document is returned.
pub fn apply_modifications(
    original: &SpecDocument,
    config: &ModificationConfig,
) -> Result<SpecDocument, ModificationError> {
    debug!(?config, "Applying modifications");

    let mut modified = original.clone();
    for transformation in pipeline() {
        if transformation.is_enabled(config) {
            transformation.apply(modified.as_value_mut(), config)?;
        }
    }
    Ok(modified)
}
