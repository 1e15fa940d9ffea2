use crate::{errors::DeskError, opentelemetry::trace_flow};
use std::sync::Arc;
use study_sdk::{
    resolve_image_url, ApiError, AssistantMessage, ChatImage, ChatMessage, ChatRequest, StudyApi,
};

const GREETING: &str = "Ask me anything about this document.";

/// A chat conversation over the study API. The transcript starts with the
/// assistant greeting and grows by one user and one assistant message per
/// send. Request failures land in the transcript as assistant apologies, so
/// the conversation always stays answerable.
pub struct ChatSession {
    api: Arc<dyn StudyApi>,
    document_id: Option<String>,
    media_base_url: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub(crate) fn new(
        api: Arc<dyn StudyApi>,
        document_id: Option<String>,
        media_base_url: String,
    ) -> Self {
        Self {
            api,
            document_id,
            media_base_url,
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    /// The transcript so far, oldest message first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one user message and return the assistant reply appended to the
    /// transcript. Blank input is dropped without a request.
    pub async fn send(&mut self, input: &str) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(input));
        let request = ChatRequest {
            messages: self.messages.clone(),
            document_id: self.document_id.clone(),
        };

        let api = self.api.clone();
        let outcome = trace_flow(
            "chat",
            self.document_id.as_deref().map(|id| ("document_id", id)),
            || async move { Ok(api.chat(request).await?) },
        )
        .await;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(error = %error, "chat request failed");
                // A backend rejection still reads as a missing answer; only
                // failures before a response count as the request breaking.
                let apology = match &error {
                    DeskError::Api(ApiError::StatusCode(..)) => {
                        "Sorry, I could not get a response."
                    }
                    _ => "Sorry, something went wrong.",
                };
                self.messages.push(ChatMessage::assistant(apology));
                return self.messages.last().cloned();
            }
        };

        let mut message = AssistantMessage::new(if reply.answer.is_empty() {
            "Sorry, I could not get a response.".to_string()
        } else {
            reply.answer
        });
        if !reply.images.is_empty() {
            message = message.with_images(reply.images);
        }
        self.messages.push(ChatMessage::Assistant(message));
        self.messages.last().cloned()
    }

    /// Resolved display URL for an image attached to a reply.
    #[must_use]
    pub fn image_url(&self, image: &ChatImage) -> String {
        resolve_image_url(&self.media_base_url, image)
    }
}
