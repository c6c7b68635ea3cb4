use crate::document::SpecDocument;
use crate::error::SerializationError;

/// Renders a document as YAML.
///
/// Output is deterministic for a given tree: mappings keep insertion order,
/// nested blocks are indented by two spaces, long scalars are never wrapped
/// and repeated subtrees are written out in full (no anchors or aliases).
pub fn to_yaml(document: &SpecDocument) -> Result<String, SerializationError> {
    let yaml = serde_yaml::to_string(document.as_value())?;
    Ok(yaml)
}

/// Size of generated text in kilobytes, as shown next to the output
pub fn size_in_kb(text: &str) -> String {
    format!("{:.2} KB", text.len() as f64 / 1024.0)
}
