use crate::document::{SpecDocument, SpecFormat};
use crate::error::ValidationServiceError;
use crate::validation_types::ValidationResult;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_VALIDATOR_URL: &str = "https://validator.swagger.io/validator/debug";

/// Exactly one representation of the document, as sent to the validator
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationPayload {
    Json(SpecDocument),
    Yaml(String),
}

impl ValidationPayload {
    /// YAML uploads are sent as the original text so nothing is re-serialized
    /// before the user edits; JSON uploads are sent as the parsed document.
    pub fn for_upload(document: &SpecDocument, raw: &str, format: SpecFormat) -> Self {
        match format {
            SpecFormat::Yaml => Self::Yaml(raw.to_string()),
            SpecFormat::Json => Self::Json(document.clone()),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Yaml(_) => "application/yaml",
        }
    }

    fn body(&self) -> Result<String, ValidationServiceError> {
        match self {
            Self::Json(document) => serde_json::to_string(document.as_value())
                .map_err(|e| ValidationServiceError::Transport(format!("Failed to encode document: {}", e))),
            Self::Yaml(text) => Ok(text.clone()),
        }
    }
}

/// Remote schema validation of a whole document
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    async fn validate(&self, payload: &ValidationPayload) -> Result<ValidationResult, ValidationServiceError>;
}

/// Client for a swagger.io-style `validator/debug` endpoint
pub struct SwaggerValidatorClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SwaggerValidatorClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ValidationServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ValidationServiceError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SchemaValidator for SwaggerValidatorClient {
    async fn validate(&self, payload: &ValidationPayload) -> Result<ValidationResult, ValidationServiceError> {
        debug!(endpoint = %self.endpoint, content_type = payload.content_type(), "Requesting schema validation");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, payload.content_type())
            .body(payload.body()?)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ValidationServiceError::Timeout(self.timeout)
                } else {
                    ValidationServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Swagger validation request failed");
            return Err(ValidationServiceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ValidationServiceError::Transport(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| ValidationServiceError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation_types::Severity;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn document() -> SpecDocument {
        SpecDocument::new(json!({
            "openapi": "3.0.0",
            "info": { "title": "Test API", "version": "1.0.0" },
            "paths": {}
        }))
    }

    fn client_for(server: &MockServer) -> SwaggerValidatorClient {
        let url = format!("{}/validator/debug", server.uri());
        SwaggerValidatorClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_payload_selection() {
        let doc = document();
        let yaml = ValidationPayload::for_upload(&doc, "openapi: 3.0.0\n", SpecFormat::Yaml);
        assert_eq!(yaml, ValidationPayload::Yaml("openapi: 3.0.0\n".to_string()));
        assert_eq!(yaml.content_type(), "application/yaml");

        let json = ValidationPayload::for_upload(&doc, "{}", SpecFormat::Json);
        assert_eq!(json, ValidationPayload::Json(doc));
        assert_eq!(json.content_type(), "application/json");
    }

    #[tokio::test]
    async fn test_validate_json_document() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validator/debug"))
            .and(header("content-type", "application/json"))
            .and(body_json(document().as_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "schemaValidationMessages": [{
                    "level": "warning",
                    "domain": "validation",
                    "keyword": "format",
                    "message": "unknown format",
                    "schema": { "loadingURI": "#", "pointer": "/definitions/x" },
                    "instance": { "pointer": "/info" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .validate(&ValidationPayload::Json(document()))
            .await
            .unwrap();

        assert!(result.messages.is_empty());
        assert_eq!(result.schema_validation_messages.len(), 1);
        assert_eq!(result.schema_validation_messages[0].level, Severity::Warning);
        assert_eq!(result.schema_validation_messages[0].instance.pointer, "/info");
    }

    #[tokio::test]
    async fn test_validate_raw_yaml() {
        let server = MockServer::start().await;
        let raw = "openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths: {}\n";

        Mock::given(method("POST"))
            .and(header("content-type", "application/yaml"))
            .and(body_string(raw))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .validate(&ValidationPayload::Yaml(raw.to_string()))
            .await
            .unwrap();

        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .validate(&ValidationPayload::Json(document()))
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationServiceError::Status { status: 503 }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .validate(&ValidationPayload::Json(document()))
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}").set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let url = format!("{}/validator/debug", server.uri());
        let client = SwaggerValidatorClient::new(url, Duration::from_millis(200)).unwrap();
        let err = client
            .validate(&ValidationPayload::Json(document()))
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationServiceError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = SwaggerValidatorClient::new("http://127.0.0.1:9/validator/debug", Duration::from_secs(2)).unwrap();
        let err = client
            .validate(&ValidationPayload::Json(document()))
            .await
            .unwrap_err();

        assert!(matches!(err, ValidationServiceError::Transport(_) | ValidationServiceError::Timeout(_)));
    }
}
