use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement line the backend sends for a successful PDF ingestion.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "PDF processed";

/// Lifecycle state of a game generation job.
///
/// The pipeline moves forward through the generating states and settles in
/// either `Completed` or `Failed`. A snapshot missing the status field
/// deserializes as `Queued`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Queued,
    GeneratingDesign,
    GeneratingLevels,
    GeneratingCode,
    Completed,
    Failed,
}

/// Acknowledgement returned when a game generation job is enqueued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct GameTicket {
    /// Identifier used to poll job status and launch the finished game.
    pub task_id: String,
    /// Initial lifecycle state, normally `Queued`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// The document the job was started for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Point-in-time view of a game generation job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct TaskSnapshot {
    /// Lifecycle state of the job.
    #[serde(default)]
    pub status: TaskStatus,
    /// Human-readable description of the current pipeline stage,
    /// e.g. "Game Design (1/3)".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Failure reason, populated once the job fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Design document produced by the first pipeline stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_design: Option<Value>,
    /// Level layout produced by the second pipeline stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_design: Option<Value>,
    /// Generated game source, present once the job completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Server path of the written game file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// A past game generation job as reported by the engine history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct TaskHistoryEntry {
    pub task_id: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Outcome of a PDF ingestion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct UploadReceipt {
    /// Backend acknowledgement line. [`UPLOAD_SUCCESS_MESSAGE`] marks success.
    pub message: String,
    /// Identifier assigned to the ingested document.
    pub document_id: String,
    /// Number of characters extracted from the PDF text layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters_extracted: Option<u64>,
    /// Number of retrieval chunks the text was split into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<u64>,
    /// Number of page images extracted for visual grounding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<u64>,
}

/// Outcome of a slide-video render over an ingested document.
///
/// The render endpoint reports failures in the body of a success response,
/// so both `error` and `video_path` may need inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct VideoArtifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server path of the rendered video, relative to the backend origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    /// Set when the render pipeline failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_generated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_requested: Option<u64>,
}

/// Structured study notes generated from a document.
///
/// Every section is optional. The model behind the notes endpoint does not
/// always honor the requested schema, so missing sections deserialize as
/// empty rather than failing the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct StudyNotes {
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    /// One-page revision sheet in markdown.
    #[serde(default)]
    pub cheat_sheet: String,
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
    #[serde(default)]
    pub interview_questions: Vec<String>,
}

/// A question and answer pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Flashcard {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// A multiple-choice question with its options and expected answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Mcq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: String,
}

/// A message in a document chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    User(UserMessage),
    Assistant(AssistantMessage),
}

/// A message sent by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct UserMessage {
    pub content: String,
}

/// A message produced by the assistant, optionally grounded with images
/// pulled from the source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct AssistantMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ChatImage>>,
}

/// A document image attached to an assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ChatImage {
    /// Fully qualified image URL. Preferred over `path` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Server path of the image, relative to the backend origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Text recognized inside the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<String>,
    /// Snippet of page text surrounding the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Request body for the document chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ChatRequest {
    /// Conversation history, oldest first. The backend answers the most
    /// recent user message.
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Answer to a document chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ChatReply {
    /// Markdown answer text. Empty when the backend could not produce one.
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub images: Vec<ChatImage>,
    /// Raw retrieval context the answer was grounded on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Request body for the notes and summary endpoints.
///
/// With neither field set the backend falls back to the most recently
/// uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct NotesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Raw text to build notes from instead of an uploaded document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
