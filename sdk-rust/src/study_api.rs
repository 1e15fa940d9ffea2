use crate::{
    ApiResult, ChatReply, ChatRequest, GameTicket, NotesRequest, TaskSnapshot, UploadReceipt,
    VideoArtifact,
};
use serde_json::Value;

/// Status and launch surface shared by every backend that runs game
/// generation jobs.
#[async_trait::async_trait]
pub trait TaskApi: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot>;
    async fn launch(&self, task_id: &str) -> ApiResult<()>;
}

/// The full document-insight surface of a Studyhall backend.
///
/// The notes and summary payloads come back as raw JSON. The model behind
/// those endpoints does not reliably honor its output schema, so decoding
/// happens downstream where fallbacks can apply.
#[async_trait::async_trait]
pub trait StudyApi: TaskApi {
    async fn upload_pdf(&self, file_name: &str, data: Vec<u8>) -> ApiResult<UploadReceipt>;
    async fn generate_video(&self, document_id: &str) -> ApiResult<VideoArtifact>;
    async fn generate_game(&self, document_id: &str) -> ApiResult<GameTicket>;
    async fn summary(&self, request: NotesRequest) -> ApiResult<Value>;
    async fn notes(&self, request: NotesRequest) -> ApiResult<Value>;
    async fn chat(&self, request: ChatRequest) -> ApiResult<ChatReply>;
}
