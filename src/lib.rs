pub mod document;
pub mod error;
pub mod modifications;
pub mod session;
pub mod settings;
pub mod source;
pub mod spec;
pub mod validation_types;
pub mod validator_client;

pub use document::{SpecDialect, SpecDocument, SpecFormat};
pub use error::{
    LoadError, ModificationError, ParseError, SerializationError, SessionError, SettingsError, ShapeError,
    SpecToolError, ValidationServiceError,
};
pub use modifications::{apply_modifications, ModificationConfig, TimeObjectFix, Transformation, VersionOverride};
pub use session::{
    ActiveTab, DownloadArtifact, FileState, LoadToken, PreviewModel, Session, SessionController, SessionEvent,
    ValidationOutcome, ValidationTicket,
};
pub use settings::Settings;
pub use source::{download_file_name, modified_file_name, SourceFile};
pub use spec::{check_shape, looks_like_openapi, parse_spec, parse_value, size_in_kb, to_yaml};
pub use validation_types::{Severity, SchemaValidationMessage, ValidationResult, ValidationState};
pub use validator_client::{SchemaValidator, SwaggerValidatorClient, ValidationPayload, DEFAULT_VALIDATOR_URL};
