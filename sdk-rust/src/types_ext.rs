use crate::{
    AssistantMessage, ChatImage, ChatMessage, ChatRequest, Mcq, NotesRequest, StudyNotes,
    TaskStatus, UploadReceipt, UserMessage, UPLOAD_SUCCESS_MESSAGE,
};

impl TaskStatus {
    /// Whether the job has settled and will not change again.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Rough completion percentage for progress display.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        match self {
            Self::Queued | Self::Failed => 0,
            Self::GeneratingDesign => 33,
            Self::GeneratingLevels => 66,
            Self::GeneratingCode => 90,
            Self::Completed => 100,
        }
    }
}

impl UploadReceipt {
    /// Whether the backend fully ingested the PDF and assigned it an id.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.message == UPLOAD_SUCCESS_MESSAGE && !self.document_id.is_empty()
    }
}

impl UserMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl AssistantMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            images: None,
        }
    }

    #[must_use]
    pub fn with_images(mut self, images: Vec<ChatImage>) -> Self {
        self.images = Some(images);
        self
    }
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(UserMessage::new(content))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(AssistantMessage::new(content))
    }

    /// The message text, regardless of who sent it.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::User(message) => &message.content,
            Self::Assistant(message) => &message.content,
        }
    }
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, document_id: impl Into<String>) -> Self {
        Self {
            messages,
            document_id: Some(document_id.into()),
        }
    }
}

impl NotesRequest {
    /// Build notes from an ingested document.
    pub fn for_document(document_id: impl Into<String>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            text: None,
        }
    }

    /// Build notes from raw text instead of an uploaded document.
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            document_id: None,
            text: Some(text.into()),
        }
    }
}

impl StudyNotes {
    /// Whether any section holds displayable content. Mirrors the section
    /// checks done when rendering: blank strings and empty lists count as
    /// missing.
    #[must_use]
    pub fn has_sections(&self) -> bool {
        !self.flashcards.is_empty()
            || !self.cheat_sheet.trim().is_empty()
            || !self.mcqs.is_empty()
            || !self.interview_questions.is_empty()
    }
}

impl Mcq {
    /// Whether `option` is the recorded answer for this question.
    #[must_use]
    pub fn is_answer(&self, option: &str) -> bool {
        !self.answer.is_empty() && self.answer == option
    }
}
