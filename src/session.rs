use crate::document::{SpecDocument, SpecFormat};
use crate::error::{SessionError, ValidationServiceError};
use crate::modifications::{apply_modifications, ModificationConfig};
use crate::source::{download_file_name, modified_file_name, SourceFile};
use crate::spec::{looks_like_openapi, parse_spec, parse_value, to_yaml};
use crate::validation_types::{ValidationResult, ValidationState};
use crate::validator_client::{SchemaValidator, ValidationPayload};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

pub const EMPTY_FILE_MESSAGE: &str = "Failed to read file or file was empty.";

/// Lifecycle of the uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileState {
    #[default]
    Empty,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoadStarted,
    LoadSucceeded,
    LoadFailed,
    Cleared,
}

impl SessionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadStarted => "load started",
            Self::LoadSucceeded => "load succeeded",
            Self::LoadFailed => "load failed",
            Self::Cleared => "cleared",
        }
    }
}

impl FileState {
    pub fn next(self, event: SessionEvent) -> Result<FileState, SessionError> {
        use FileState::*;
        use SessionEvent::*;

        match (self, event) {
            (_, LoadStarted) => Ok(Loading),
            (Loading, LoadSucceeded) => Ok(Loaded),
            (Loading, LoadFailed) => Ok(Error),
            (_, Cleared) => Ok(Empty),
            (from, event) => Err(SessionError::InvalidTransition {
                from,
                event: event.as_str(),
            }),
        }
    }
}

/// Identifies one load. Only the newest token may commit validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LoadToken(u64);

impl LoadToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Yaml,
    Preview,
}

/// A remote validation call that belongs to one load
#[derive(Debug, Clone)]
pub struct ValidationTicket {
    pub token: LoadToken,
    pub payload: ValidationPayload,
}

impl ValidationTicket {
    pub async fn run(self, validator: &dyn SchemaValidator) -> ValidationOutcome {
        let result = validator.validate(&self.payload).await;
        ValidationOutcome {
            token: self.token,
            result,
        }
    }
}

#[derive(Debug)]
pub struct ValidationOutcome {
    pub token: LoadToken,
    pub result: Result<ValidationResult, ValidationServiceError>,
}

/// What the documentation renderer receives
#[derive(Debug, Clone, Copy)]
pub struct PreviewModel<'a> {
    /// `None` renders the empty-state prompt
    pub document: Option<&'a Value>,
    pub validation: &'a ValidationState,
}

impl<'a> PreviewModel<'a> {
    pub fn diagnostics(&self) -> Option<&'a ValidationResult> {
        self.validation.result()
    }
}

/// The generated YAML, ready to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes).map_err(|source| SessionError::Save {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Saved modified specification");
        Ok(path)
    }
}

/// State of one editing session.
///
/// The original document is never edited; every configuration change
/// re-derives the YAML text and the preview document from it.
#[derive(Debug, Default)]
pub struct Session {
    state: FileState,
    token: LoadToken,
    file_name: Option<String>,
    original: Option<SpecDocument>,
    config: ModificationConfig,
    modified_yaml: String,
    modified_document: Option<Value>,
    error: Option<String>,
    validation: ValidationState,
    active_tab: ActiveTab,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn original(&self) -> Option<&SpecDocument> {
        self.original.as_ref()
    }

    pub fn config(&self) -> &ModificationConfig {
        &self.config
    }

    pub fn modified_yaml(&self) -> &str {
        &self.modified_yaml
    }

    pub fn modified_document(&self) -> Option<&Value> {
        self.modified_document.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    pub fn preview(&self) -> PreviewModel<'_> {
        PreviewModel {
            document: self.modified_document.as_ref(),
            validation: &self.validation,
        }
    }

    /// Starts a new load and parses the file synchronously.
    ///
    /// Returns the validation call to run when the document was accepted.
    pub fn begin_load(&mut self, source: SourceFile) -> Result<Option<ValidationTicket>, SessionError> {
        self.state = self.state.next(SessionEvent::LoadStarted)?;
        self.token = self.token.next();
        self.reset_derived();
        self.file_name = Some(source.name.clone());
        debug!(file = %source.name, token = self.token.0, "Loading specification");

        if source.content.is_empty() {
            self.fail_load(EMPTY_FILE_MESSAGE.to_string())?;
            return Ok(None);
        }

        let format = source.format();
        let document = match parse_spec(&source.content, format) {
            Ok(document) => document,
            Err(e) => {
                error!(file = %source.name, "Error validating/parsing specification: {}", e);
                self.fail_load(e.to_string())?;
                return Ok(None);
            }
        };

        self.state = self.state.next(SessionEvent::LoadSucceeded)?;
        info!(
            file = %source.name,
            title = document.title().unwrap_or_default(),
            "Loaded specification"
        );

        let payload = ValidationPayload::for_upload(&document, &source.content, format);
        self.config = ModificationConfig::for_document(&document);
        self.original = Some(document);
        self.validation = ValidationState::Pending;
        self.regenerate();

        Ok(Some(ValidationTicket {
            token: self.token,
            payload,
        }))
    }

    /// Merges a validation result if it belongs to the current load.
    ///
    /// Returns `false` when the outcome was stale and discarded.
    pub fn commit_validation(&mut self, outcome: ValidationOutcome) -> bool {
        if outcome.token != self.token || self.state != FileState::Loaded {
            warn!(
                stale = outcome.token.0,
                current = self.token.0,
                "Discarding validation result of a superseded load"
            );
            return false;
        }

        self.validation = match outcome.result {
            Ok(result) => {
                debug!(
                    messages = result.messages.len(),
                    findings = result.schema_validation_messages.len(),
                    "Schema validation finished"
                );
                ValidationState::Complete(result)
            }
            Err(e) => {
                warn!("Swagger validation unavailable: {}", e);
                ValidationState::Unavailable { reason: e.to_string() }
            }
        };
        true
    }

    /// Marks the current load as not remotely validated
    pub fn skip_validation(&mut self, token: LoadToken) {
        if token == self.token && self.validation.is_loading() {
            self.validation = ValidationState::NotRequested;
        }
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.state = self.state.next(SessionEvent::Cleared)?;
        self.token = self.token.next();
        self.reset_derived();
        Ok(())
    }

    pub fn set_config(&mut self, config: ModificationConfig) {
        self.config = config;
        self.regenerate();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.config.version = Some(version.into());
        self.regenerate();
    }

    pub fn set_time_object_fix(&mut self, enabled: bool) {
        self.config.apply_time_object_fix = enabled;
        self.regenerate();
    }

    pub fn toggle_time_object_fix(&mut self) {
        self.set_time_object_fix(!self.config.apply_time_object_fix);
    }

    /// Packages the current YAML for saving
    pub fn download(&self, product_name: &str) -> Result<DownloadArtifact, SessionError> {
        if self.modified_yaml.is_empty() {
            return Err(SessionError::NothingToDownload);
        }

        let version = self
            .config
            .effective_version()
            .map(str::to_string)
            .or_else(|| self.original.as_ref().and_then(SpecDocument::info_version))
            .unwrap_or_else(|| "unversioned".to_string());

        Ok(self.artifact(download_file_name(product_name, &version)))
    }

    /// Same content as [`Session::download`], named `<upload>-modified-<date>.yaml`
    pub fn download_dated(&self, date: NaiveDate) -> Result<DownloadArtifact, SessionError> {
        if self.modified_yaml.is_empty() {
            return Err(SessionError::NothingToDownload);
        }
        let file_name = modified_file_name(self.file_name.as_deref().unwrap_or_default(), date);
        Ok(self.artifact(file_name))
    }

    /// Whether the current output still declares an `openapi`/`swagger` marker
    pub fn output_looks_like_openapi(&self) -> bool {
        looks_like_openapi(&self.modified_yaml)
    }

    fn artifact(&self, file_name: String) -> DownloadArtifact {
        DownloadArtifact {
            file_name,
            mime_type: "text/yaml",
            bytes: self.modified_yaml.clone().into_bytes(),
        }
    }

    fn fail_load(&mut self, message: String) -> Result<(), SessionError> {
        self.state = self.state.next(SessionEvent::LoadFailed)?;
        self.validation = ValidationState::Complete(ValidationResult::from_message(message.clone()));
        self.error = Some(message);
        Ok(())
    }

    fn reset_derived(&mut self) {
        self.file_name = None;
        self.original = None;
        self.config = ModificationConfig::default();
        self.modified_yaml.clear();
        self.modified_document = None;
        self.error = None;
        self.validation = ValidationState::NotRequested;
        self.active_tab = ActiveTab::Yaml;
    }

    /// Re-runs modification and serialization, then re-reads the YAML for the preview
    fn regenerate(&mut self) {
        let Some(original) = &self.original else {
            self.modified_yaml.clear();
            self.modified_document = None;
            return;
        };

        let yaml = apply_modifications(original, &self.config)
            .map_err(|e| e.to_string())
            .and_then(|modified| to_yaml(&modified).map_err(|e| e.to_string()));

        match yaml {
            Ok(yaml) => {
                self.modified_yaml = yaml;
                self.modified_document = match parse_value(&self.modified_yaml, SpecFormat::Yaml) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        error!("Error parsing modified YAML for preview: {}", e);
                        None
                    }
                };
            }
            Err(e) => {
                error!("Error applying modifications: {}", e);
                self.modified_yaml.clear();
                self.modified_document = None;
            }
        }
    }
}

/// Shares one [`Session`] between the UI side and in-flight validation calls
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    validator: Option<Arc<dyn SchemaValidator>>,
}

impl SessionController {
    pub fn new(validator: Arc<dyn SchemaValidator>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            validator: Some(validator),
        }
    }

    pub fn without_remote_validation() -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            validator: None,
        }
    }

    /// Runs `f` with exclusive access to the session. Never held across an await.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Loads a file and waits for its remote validation.
    ///
    /// Returns whether the validation result was committed; a later load
    /// that started meanwhile makes this one's result stale.
    pub async fn load_file(&self, source: SourceFile) -> Result<bool, SessionError> {
        let Some(ticket) = self.with_session(|session| session.begin_load(source))? else {
            return Ok(false);
        };

        match &self.validator {
            Some(validator) => {
                let outcome = ticket.run(validator.as_ref()).await;
                Ok(self.with_session(|session| session.commit_validation(outcome)))
            }
            None => {
                self.with_session(|session| session.skip_validation(ticket.token));
                Ok(false)
            }
        }
    }
}
