use crate::document::{scalar_text, SpecDocument, SpecFormat};
use crate::error::{LoadError, ParseError, ShapeError};
use serde_json::Value;

/// Parses an uploaded specification and checks its minimal OpenAPI shape.
///
/// The returned document is the full structural value, with no field
/// normalized or stripped. Callers must reject empty text before calling.
pub fn parse_spec(raw: &str, format: SpecFormat) -> Result<SpecDocument, LoadError> {
    let value = parse_value(raw, format)?;
    check_shape(&value)?;
    Ok(SpecDocument::new(value))
}

/// Parses JSON or YAML text into a generic value without any shape check
pub fn parse_value(raw: &str, format: SpecFormat) -> Result<Value, ParseError> {
    match format {
        SpecFormat::Json => serde_json::from_str(raw).map_err(|e| ParseError {
            format,
            message: e.to_string(),
        }),
        SpecFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| ParseError {
            format,
            message: e.to_string(),
        }),
    }
}

/// Required-field presence check: version marker, `info.title`, `info.version`, `paths`
pub fn check_shape(value: &Value) -> Result<(), ShapeError> {
    let root = value.as_object().ok_or(ShapeError::NotAnObject)?;

    let has_marker = ["openapi", "swagger"]
        .iter()
        .any(|key| root.get(*key).and_then(scalar_text).is_some());
    if !has_marker {
        return Err(ShapeError::MissingVersionMarker);
    }

    let info = root
        .get("info")
        .and_then(Value::as_object)
        .ok_or(ShapeError::MissingInfo)?;

    match info.get("title") {
        Some(Value::String(title)) if !title.is_empty() => {}
        _ => return Err(ShapeError::MissingTitle),
    }

    if info.get("version").and_then(scalar_text).is_none() {
        return Err(ShapeError::MissingInfoVersion);
    }

    match root.get("paths") {
        Some(Value::Object(_)) => Ok(()),
        _ => Err(ShapeError::MissingPaths),
    }
}

/// Quick check that YAML text parses and carries an `openapi` or `swagger` marker
pub fn looks_like_openapi(yaml: &str) -> bool {
    match parse_value(yaml, SpecFormat::Yaml) {
        Ok(value) => SpecDocument::new(value).dialect().is_some(),
        Err(_) => false,
    }
}
