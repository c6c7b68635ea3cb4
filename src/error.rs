use crate::document::SpecFormat;
use crate::session::FileState;
use thiserror::Error;

/// Raw text could not be read as JSON or YAML
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to parse {format}: {message}")]
pub struct ParseError {
    pub format: SpecFormat,
    pub message: String,
}

/// Well-formed text that is not a recognizable OpenAPI/Swagger document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("The uploaded document is not an object.")]
    NotAnObject,

    #[error("The uploaded document does not appear to be a valid OpenAPI (Swagger) specification. Missing \"openapi\" or \"swagger\" property.")]
    MissingVersionMarker,

    #[error("Invalid OpenAPI (Swagger) specification: Missing \"info\" object.")]
    MissingInfo,

    #[error("Invalid OpenAPI (Swagger) specification: Missing or empty \"info.title\".")]
    MissingTitle,

    #[error("Invalid OpenAPI (Swagger) specification: Missing or empty \"info.version\".")]
    MissingInfoVersion,

    #[error("Invalid OpenAPI (Swagger) specification: Missing \"paths\" object.")]
    MissingPaths,
}

/// Failure of the Document Parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// The remote schema-validation service could not produce a result
#[derive(Error, Debug)]
pub enum ValidationServiceError {
    #[error("Validation API request failed: {0}")]
    Transport(String),

    #[error("Validation API request failed: HTTP {status}")]
    Status { status: u16 },

    #[error("Validation API request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Validation API returned an unreadable body: {0}")]
    Decode(String),
}

/// A transformation could not be applied without losing content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModificationError {
    #[error("Cannot merge into {pointer}: expected a mapping, found {found}")]
    NotAMapping { pointer: String, found: &'static str },
}

#[derive(Error, Debug)]
#[error("Failed to convert OpenAPI specification to YAML format: {0}")]
pub struct SerializationError(#[from] pub serde_yaml::Error);

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session transition from {from:?} on {event}")]
    InvalidTransition { from: FileState, event: &'static str },

    #[error("No YAML content to download.")]
    NothingToDownload,

    #[error("Failed to save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level error used at the CLI boundary
#[derive(Error, Debug)]
pub enum SpecToolError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    ValidationService(#[from] ValidationServiceError),

    #[error(transparent)]
    Modification(#[from] ModificationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
