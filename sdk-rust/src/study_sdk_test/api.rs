use std::{collections::VecDeque, sync::Mutex};

use serde_json::Value;

use crate::{
    errors::{ApiError, ApiResult},
    study_api::{StudyApi, TaskApi},
    ChatReply, ChatRequest, GameTicket, NotesRequest, TaskSnapshot, UploadReceipt, VideoArtifact,
};

/// Result for a mocked API call.
/// It can either be a value or an error to return.
pub enum MockResult<T> {
    Value(T),
    Error(ApiError),
}

impl<T> MockResult<T> {
    /// Construct a result that yields the provided value.
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: ApiError) -> Self {
        Self::Error(error)
    }
}

impl<T> From<T> for MockResult<T> {
    fn from(value: T) -> Self {
        Self::value(value)
    }
}

impl<T> From<ApiResult<T>> for MockResult<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::Error(error),
        }
    }
}

struct MockQueue<I, T> {
    results: VecDeque<MockResult<T>>,
    inputs: Vec<I>,
}

impl<I, T> Default for MockQueue<I, T> {
    fn default() -> Self {
        Self {
            results: VecDeque::new(),
            inputs: Vec::new(),
        }
    }
}

impl<I, T> MockQueue<I, T> {
    fn next(&mut self, provider: &'static str, operation: &str) -> ApiResult<T> {
        let result = self.results.pop_front().ok_or_else(|| {
            ApiError::Invariant(provider, format!("no mocked {operation} results available"))
        })?;

        match result {
            MockResult::Value(value) => Ok(value),
            MockResult::Error(error) => Err(error),
        }
    }
}

#[derive(Default)]
struct MockStudyApiState {
    status: MockQueue<String, TaskSnapshot>,
    launch: MockQueue<String, ()>,
    upload: MockQueue<(String, Vec<u8>), UploadReceipt>,
    video: MockQueue<String, VideoArtifact>,
    game: MockQueue<String, GameTicket>,
    summary: MockQueue<NotesRequest, Value>,
    notes: MockQueue<NotesRequest, Value>,
    chat: MockQueue<ChatRequest, ChatReply>,
}

impl MockStudyApiState {
    fn reset(&mut self) {
        self.status.inputs.clear();
        self.launch.inputs.clear();
        self.upload.inputs.clear();
        self.video.inputs.clear();
        self.game.inputs.clear();
        self.summary.inputs.clear();
        self.notes.inputs.clear();
        self.chat.inputs.clear();
    }

    fn restore(&mut self) {
        self.status.results.clear();
        self.launch.results.clear();
        self.upload.results.clear();
        self.video.results.clear();
        self.game.results.clear();
        self.summary.results.clear();
        self.notes.results.clear();
        self.chat.results.clear();
        self.reset();
    }
}

/// A mock study API for testing that tracks inputs and yields predefined
/// outputs.
pub struct MockStudyApi {
    provider: &'static str,
    state: Mutex<MockStudyApiState>,
}

impl Default for MockStudyApi {
    fn default() -> Self {
        Self {
            provider: "mock",
            state: Mutex::new(MockStudyApiState::default()),
        }
    }
}

impl MockStudyApi {
    /// Construct a new mock study API instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Enqueue a mocked status result.
    pub fn enqueue_status<R: Into<MockResult<TaskSnapshot>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.status.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked launch result.
    pub fn enqueue_launch<R: Into<MockResult<()>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.launch.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked upload result.
    pub fn enqueue_upload<R: Into<MockResult<UploadReceipt>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.upload.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked video generation result.
    pub fn enqueue_video<R: Into<MockResult<VideoArtifact>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.video.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked game generation result.
    pub fn enqueue_game<R: Into<MockResult<GameTicket>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.game.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked summary result.
    pub fn enqueue_summary<R: Into<MockResult<Value>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.summary.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked notes result.
    pub fn enqueue_notes<R: Into<MockResult<Value>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.notes.results.push_back(result.into());
        drop(state);
        self
    }

    /// Enqueue a mocked chat result.
    pub fn enqueue_chat<R: Into<MockResult<ChatReply>>>(&self, result: R) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.chat.results.push_back(result.into());
        drop(state);
        self
    }

    /// Task ids passed to `fetch_status` so far.
    pub fn tracked_status_inputs(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.status.inputs.clone()
    }

    /// Task ids passed to `launch` so far.
    pub fn tracked_launch_inputs(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.launch.inputs.clone()
    }

    /// File names and payloads passed to `upload_pdf` so far.
    pub fn tracked_upload_inputs(&self) -> Vec<(String, Vec<u8>)> {
        let state = self.state.lock().expect("mock state poisoned");
        state.upload.inputs.clone()
    }

    /// Document ids passed to `generate_video` so far.
    pub fn tracked_video_inputs(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.video.inputs.clone()
    }

    /// Document ids passed to `generate_game` so far.
    pub fn tracked_game_inputs(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.game.inputs.clone()
    }

    /// Requests passed to `summary` so far.
    pub fn tracked_summary_inputs(&self) -> Vec<NotesRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.summary.inputs.clone()
    }

    /// Requests passed to `notes` so far.
    pub fn tracked_notes_inputs(&self) -> Vec<NotesRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.notes.inputs.clone()
    }

    /// Requests passed to `chat` so far.
    pub fn tracked_chat_inputs(&self) -> Vec<ChatRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.chat.inputs.clone()
    }

    /// Reset tracked inputs without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl TaskApi for MockStudyApi {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.status.inputs.push(task_id.to_string());
        state.status.next(self.provider, "status")
    }

    async fn launch(&self, task_id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.launch.inputs.push(task_id.to_string());
        state.launch.next(self.provider, "launch")
    }
}

#[async_trait::async_trait]
impl StudyApi for MockStudyApi {
    async fn upload_pdf(&self, file_name: &str, data: Vec<u8>) -> ApiResult<UploadReceipt> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.upload.inputs.push((file_name.to_string(), data));
        state.upload.next(self.provider, "upload")
    }

    async fn generate_video(&self, document_id: &str) -> ApiResult<VideoArtifact> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.video.inputs.push(document_id.to_string());
        state.video.next(self.provider, "video")
    }

    async fn generate_game(&self, document_id: &str) -> ApiResult<GameTicket> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.game.inputs.push(document_id.to_string());
        state.game.next(self.provider, "game")
    }

    async fn summary(&self, request: NotesRequest) -> ApiResult<Value> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.summary.inputs.push(request);
        state.summary.next(self.provider, "summary")
    }

    async fn notes(&self, request: NotesRequest) -> ApiResult<Value> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.notes.inputs.push(request);
        state.notes.next(self.provider, "notes")
    }

    async fn chat(&self, request: ChatRequest) -> ApiResult<ChatReply> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.chat.inputs.push(request);
        state.chat.next(self.provider, "chat")
    }
}
