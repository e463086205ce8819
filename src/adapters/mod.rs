//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the generative agent service and
//! the knowledge-base service. The orchestrator only sees the traits.

pub mod agent;
pub mod knowledge;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::lenient::{from_object, lenient};

// Re-export the HTTP adapters
pub use agent::HttpAgentClient;
pub use knowledge::HttpKnowledgeBase;

/// Reply from an agent invocation.
///
/// Keeps the untouched payload alongside a lenient typed view, because the
/// artifact resolver needs to look at shapes the typed view does not model.
#[derive(Debug, Clone, Default)]
pub struct AgentResponse {
    pub success: bool,
    pub response: Option<AgentResponseBody>,
    pub error: Option<String>,
    payload: Value,
}

/// Typed view of the `response` envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentResponseBody {
    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    success: Option<bool>,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    error: Option<String>,
}

impl AgentResponse {
    /// Build from a raw payload. Never fails; missing fields read as absent.
    pub fn from_payload(payload: Value) -> Self {
        let envelope: Envelope = from_object(&payload);
        let response = envelope
            .response
            .filter(Value::is_object)
            .map(|body| from_object::<AgentResponseBody>(&body));

        Self {
            success: envelope.success.unwrap_or(false),
            response,
            error: envelope.error.filter(|e| !e.is_empty()),
            payload,
        }
    }

    /// The agent's structured `response.result`, if present and not null
    pub fn result(&self) -> Option<&Value> {
        self.response
            .as_ref()
            .and_then(|r| r.result.as_ref())
            .filter(|v| !v.is_null())
    }

    /// `response.message`, if non-empty
    pub fn message(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.message.as_deref())
            .filter(|m| !m.is_empty())
    }

    /// The full payload as received
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Generative agent service
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Send a prompt to the agent with the given identity.
    ///
    /// `Err` means a transport-level failure; an agent-reported failure comes
    /// back as `Ok` with `success == false`.
    async fn invoke(&self, prompt: &str, agent_id: &str) -> Result<AgentResponse>;
}

/// Document held by the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseDocument {
    #[serde(rename = "fileName")]
    pub file_name: String,

    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

/// Reply to a document listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListing {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub documents: Option<Vec<KnowledgeBaseDocument>>,
}

/// Reply to an upload or delete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBaseReply {
    #[serde(default)]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,

    /// Declared MIME type, when the source knows it
    pub content_type: Option<String>,

    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Retrieval knowledge-base service
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn list_documents(&self, kb_id: &str) -> Result<DocumentListing>;

    async fn upload_and_train(&self, kb_id: &str, file: &UploadFile) -> Result<KnowledgeBaseReply>;

    async fn delete_documents(&self, kb_id: &str, file_names: &[String]) -> Result<KnowledgeBaseReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_response_success() {
        let response = AgentResponse::from_payload(json!({
            "success": true,
            "response": {"result": {"content_title": "Y"}, "message": "ok"}
        }));

        assert!(response.success);
        assert_eq!(response.result().unwrap()["content_title"], "Y");
        assert_eq!(response.message(), Some("ok"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_agent_response_malformed() {
        let response = AgentResponse::from_payload(json!({
            "success": "yes",
            "response": "flat string",
            "error": {"code": 5}
        }));

        assert!(!response.success);
        assert!(response.response.is_none());
        assert!(response.error.is_none());
        assert!(response.result().is_none());
    }

    #[test]
    fn test_null_result_is_absent() {
        let response = AgentResponse::from_payload(json!({
            "success": true,
            "response": {"result": null}
        }));
        assert!(response.result().is_none());
    }

    #[test]
    fn test_non_object_payload() {
        let response = AgentResponse::from_payload(json!([1, 2, 3]));
        assert!(!response.success);
        assert_eq!(response.payload(), &json!([1, 2, 3]));
    }

    #[test]
    fn test_document_listing_parse() {
        let listing: DocumentListing = serde_json::from_value(json!({
            "success": true,
            "documents": [{"fileName": "brand.pdf", "status": "trained"}]
        }))
        .unwrap();

        let docs = listing.documents.unwrap();
        assert_eq!(docs[0].file_name, "brand.pdf");
        assert_eq!(docs[0].status.as_deref(), Some("trained"));
    }
}
