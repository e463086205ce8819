//! Knowledge-base document management.
//!
//! Keeps a cached listing of the brand knowledge base and validates uploads
//! locally before anything is sent to the service.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{KnowledgeBase, KnowledgeBaseDocument, UploadFile};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// Message reported after a successful upload
pub const UPLOAD_SUCCEEDED: &str = "Document uploaded and training started successfully.";

const SERVER_ERROR: &str = "The server returned an error. Please try again.";

/// Document formats the knowledge base accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Accept by declared MIME type first, then by file extension
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_file_name(file_name))
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOCX_MIME => Some(DocumentKind::Docx),
            TEXT_MIME => Some(DocumentKind::Text),
            _ => None,
        }
    }

    /// Text after the last `.`; a name without a dot is its own extension
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
            DocumentKind::Text => TEXT_MIME,
        }
    }
}

/// Why an upload did not go through. Display is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select a file first.")]
    NoFile,

    #[error("Unsupported file type. Please upload PDF, DOCX, or TXT files only.")]
    UnsupportedType,

    /// The service answered but reported failure
    #[error("Upload failed: {0}")]
    Rejected(String),

    /// The service could not be reached
    #[error("Upload failed: {0}")]
    Transport(String),
}

/// Cached view over one knowledge base
pub struct KnowledgeBaseManager {
    service: Arc<dyn KnowledgeBase>,
    kb_id: String,
    documents: Vec<KnowledgeBaseDocument>,
}

impl KnowledgeBaseManager {
    pub fn new(service: Arc<dyn KnowledgeBase>, kb_id: impl Into<String>) -> Self {
        Self {
            service,
            kb_id: kb_id.into(),
            documents: Vec::new(),
        }
    }

    pub fn kb_id(&self) -> &str {
        &self.kb_id
    }

    /// Cached document listing
    pub fn documents(&self) -> &[KnowledgeBaseDocument] {
        &self.documents
    }

    /// Re-list documents. The cache is only replaced by a successful listing.
    #[instrument(skip(self), fields(kb_id = %self.kb_id))]
    pub async fn refresh(&mut self) {
        match self.service.list_documents(&self.kb_id).await {
            Ok(listing) if listing.success => match listing.documents {
                Some(documents) => {
                    debug!(count = documents.len(), "Knowledge base listing refreshed");
                    self.documents = documents;
                }
                None => debug!("Listing carried no documents, keeping cache"),
            },
            Ok(_) => warn!("Knowledge base reported a failed listing"),
            Err(e) => warn!(error = %e, "Failed to list knowledge base documents"),
        }
    }

    /// Validate and upload a document, refreshing the listing on success
    #[instrument(skip(self, file), fields(kb_id = %self.kb_id, file = %file.file_name))]
    pub async fn upload(&mut self, file: &UploadFile) -> Result<&'static str, UploadError> {
        if file.file_name.trim().is_empty() {
            return Err(UploadError::NoFile);
        }

        let kind = DocumentKind::detect(file.content_type.as_deref(), &file.file_name)
            .ok_or(UploadError::UnsupportedType)?;

        let mut outgoing = file.clone();
        if outgoing.content_type.is_none() {
            outgoing.content_type = Some(kind.mime().to_string());
        }

        let reply = self
            .service
            .upload_and_train(&self.kb_id, &outgoing)
            .await
            .map_err(|e| {
                warn!(error = %e, "Upload request failed");
                UploadError::Transport(e.to_string())
            })?;

        if !reply.success {
            let reason = reply
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| SERVER_ERROR.to_string());
            warn!(reason = %reason, "Knowledge base rejected upload");
            return Err(UploadError::Rejected(reason));
        }

        info!(kind = ?kind, "Document uploaded, training started");
        self.refresh().await;
        Ok(UPLOAD_SUCCEEDED)
    }

    /// Remove a document, refreshing the listing on success.
    ///
    /// Failures are logged and otherwise ignored; returns whether the delete
    /// went through.
    #[instrument(skip(self), fields(kb_id = %self.kb_id))]
    pub async fn delete(&mut self, file_name: &str) -> bool {
        let names = [file_name.to_string()];
        match self.service.delete_documents(&self.kb_id, &names).await {
            Ok(reply) if reply.success => {
                info!("Document deleted");
                self.refresh().await;
                true
            }
            Ok(reply) => {
                warn!(error = ?reply.error, "Knowledge base refused delete");
                false
            }
            Err(e) => {
                warn!(error = %e, "Delete request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DocumentListing, KnowledgeBaseReply};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls and answers from a fixed script
    #[derive(Default)]
    struct RecordingKb {
        calls: Mutex<Vec<String>>,
        upload_reply: Option<KnowledgeBaseReply>,
        documents: Vec<KnowledgeBaseDocument>,
    }

    #[async_trait]
    impl KnowledgeBase for RecordingKb {
        async fn list_documents(&self, kb_id: &str) -> anyhow::Result<DocumentListing> {
            self.calls.lock().unwrap().push(format!("list:{}", kb_id));
            Ok(DocumentListing {
                success: true,
                documents: Some(self.documents.clone()),
            })
        }

        async fn upload_and_train(&self, _kb_id: &str, file: &UploadFile) -> anyhow::Result<KnowledgeBaseReply> {
            self.calls.lock().unwrap().push(format!(
                "upload:{}:{}",
                file.file_name,
                file.content_type.as_deref().unwrap_or("-")
            ));
            self.upload_reply
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn delete_documents(&self, _kb_id: &str, file_names: &[String]) -> anyhow::Result<KnowledgeBaseReply> {
            self.calls.lock().unwrap().push(format!("delete:{}", file_names.join(",")));
            Ok(KnowledgeBaseReply {
                success: true,
                error: None,
            })
        }
    }

    fn doc(name: &str) -> KnowledgeBaseDocument {
        KnowledgeBaseDocument {
            file_name: name.to_string(),
            status: Some("trained".to_string()),
        }
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect(None, "Brand.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect(None, "notes.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::detect(Some(DOCX_MIME), "blob"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect(Some("image/png"), "guide.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::detect(None, "report.exe"), None);
        assert_eq!(DocumentKind::detect(None, "pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::detect(None, "TXT"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::detect(None, "brand.pdf.exe"), None);
        assert_eq!(DocumentKind::detect(None, "notes."), None);
    }

    #[tokio::test]
    async fn test_upload_success_refreshes() {
        let kb = Arc::new(RecordingKb {
            upload_reply: Some(KnowledgeBaseReply {
                success: true,
                error: None,
            }),
            documents: vec![doc("brand.pdf")],
            ..Default::default()
        });
        let mut manager = KnowledgeBaseManager::new(kb.clone(), "brand");

        let message = manager.upload(&UploadFile::new("brand.pdf", b"%PDF".to_vec())).await;

        assert_eq!(message, Ok(UPLOAD_SUCCEEDED));
        assert_eq!(manager.documents(), &[doc("brand.pdf")]);
        let calls = kb.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["upload:brand.pdf:application/pdf", "list:brand"]);
    }

    #[tokio::test]
    async fn test_upload_failures() {
        let rejecting = Arc::new(RecordingKb {
            upload_reply: Some(KnowledgeBaseReply {
                success: false,
                error: None,
            }),
            ..Default::default()
        });
        let mut manager = KnowledgeBaseManager::new(rejecting, "brand");
        let err = manager
            .upload(&UploadFile::new("a.txt", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upload failed: The server returned an error. Please try again."
        );

        let unreachable = Arc::new(RecordingKb::default());
        let mut manager = KnowledgeBaseManager::new(unreachable, "brand");
        let err = manager
            .upload(&UploadFile::new("a.txt", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: connection refused");

        let err = manager.upload(&UploadFile::new("", Vec::new())).await.unwrap_err();
        assert_eq!(err, UploadError::NoFile);
    }

    #[tokio::test]
    async fn test_delete_then_refresh() {
        let kb = Arc::new(RecordingKb::default());
        let mut manager = KnowledgeBaseManager::new(kb.clone(), "brand");

        assert!(manager.delete("old.pdf").await);

        let calls = kb.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["delete:old.pdf", "list:brand"]);
    }
}
