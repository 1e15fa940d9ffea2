use crate::{
    chat::ChatSession,
    errors::{DeskError, DeskResult},
    opentelemetry::trace_flow,
    params::DeskParams,
    session::{DeskSession, SessionParams},
};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use study_sdk::{StudyApi, UploadReceipt};

/// Entry point for the Studyhall client flows: PDF upload, document
/// sessions, and document chat.
pub struct Desk {
    api: Arc<dyn StudyApi>,
    poll_interval: Duration,
    insights_delay: Duration,
    auto_launch: bool,
    media_base_url: String,
    last_document_id: Mutex<Option<String>>,
}

impl Desk {
    #[must_use]
    pub fn new(params: DeskParams) -> Self {
        Self {
            api: params.api,
            poll_interval: params.poll_interval,
            insights_delay: params.insights_delay,
            auto_launch: params.auto_launch,
            media_base_url: params.media_base_url,
            last_document_id: Mutex::new(None),
        }
    }

    pub fn builder(api: Arc<dyn StudyApi>) -> DeskParams {
        DeskParams::new(api)
    }

    /// Upload a PDF and return the backend's ingestion receipt. The receipt
    /// must carry the processed marker and a document id before any other
    /// flow can use the document.
    pub async fn upload_pdf(&self, file_name: &str, data: Vec<u8>) -> DeskResult<UploadReceipt> {
        trace_flow("upload_pdf", None, || async {
            let receipt = self.api.upload_pdf(file_name, data).await?;
            if !receipt.is_processed() {
                return Err(DeskError::Invariant(format!(
                    "upload response missing document id (message: {})",
                    receipt.message
                )));
            }
            Ok(receipt)
        })
        .await
    }

    /// Open an uploaded document, kicking off the video render, the game
    /// generation job and both insight panes. Returns `None` when the
    /// document is the one most recently opened, so a repeated open cannot
    /// restart the backend pipelines.
    #[must_use]
    pub fn open_document(&self, document_id: impl Into<String>) -> Option<DeskSession> {
        let document_id = document_id.into();
        {
            let mut last = self
                .last_document_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_deref() == Some(document_id.as_str()) {
                return None;
            }
            *last = Some(document_id.clone());
        }

        Some(DeskSession::open(SessionParams {
            api: self.api.clone(),
            document_id,
            poll_interval: self.poll_interval,
            insights_delay: self.insights_delay,
            auto_launch: self.auto_launch,
            media_base_url: self.media_base_url.clone(),
        }))
    }

    /// Chat without an opened document. The backend answers against the
    /// most recently uploaded one.
    #[must_use]
    pub fn chat(&self) -> ChatSession {
        ChatSession::new(self.api.clone(), None, self.media_base_url.clone())
    }
}
