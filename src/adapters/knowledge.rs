//! HTTP client for the retrieval knowledge base.
//!
//! Routes (relative to the configured base URL):
//! - GET    /{kb_id}/documents
//! - POST   /{kb_id}/documents   (multipart `file`)
//! - DELETE /{kb_id}/documents   (JSON `{"fileNames": [...]}`)

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::{DocumentListing, KnowledgeBase, KnowledgeBaseReply, UploadFile};

/// Knowledge-base API client
pub struct HttpKnowledgeBase {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpKnowledgeBase {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            api_key,
            client,
        })
    }

    /// Create from the resolved configuration
    pub fn from_config(config: &crate::config::ResolvedConfig) -> Result<Self> {
        Self::new(
            config.knowledge_base.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )
    }

    /// Build the documents URL for a knowledge base
    fn documents_url(&self, kb_id: &str) -> String {
        format!("{}/{}/documents", self.base_url.trim_end_matches('/'), kb_id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, what: &str) -> Result<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse knowledge base response ({})", what))
    }
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    async fn list_documents(&self, kb_id: &str) -> Result<DocumentListing> {
        let request = self.client.get(self.documents_url(kb_id));
        self.send(request, "list documents").await
    }

    async fn upload_and_train(&self, kb_id: &str, file: &UploadFile) -> Result<KnowledgeBaseReply> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.content_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);

        let request = self.client.post(self.documents_url(kb_id)).multipart(form);
        self.send(request, "upload document").await
    }

    async fn delete_documents(&self, kb_id: &str, file_names: &[String]) -> Result<KnowledgeBaseReply> {
        let request = self
            .client
            .delete(self.documents_url(kb_id))
            .json(&serde_json::json!({ "fileNames": file_names }));
        self.send(request, "delete documents").await
    }
}
