use crate::{
    client_utils, ApiError, ApiResult, ChatReply, ChatRequest, GameTicket, NotesRequest, StudyApi,
    TaskApi, TaskSnapshot, UploadReceipt, VideoArtifact,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart::{Form, Part},
    Client,
};
use serde_json::Value;
use std::collections::HashMap;

const PROVIDER: &str = "studyhall";

/// Origin of a locally run Studyhall backend. Media paths in API payloads
/// are relative to this origin.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5140";

/// Client for the Studyhall document backend.
///
/// The backend ingests PDFs, generates insights over them and proxies game
/// generation jobs to the game engine, so this client covers both the
/// [`StudyApi`] and [`TaskApi`] surfaces.
pub struct StudyhallClient {
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct StudyhallClientOptions {
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl StudyhallClient {
    #[must_use]
    pub fn new(options: StudyhallClientOptions) -> Self {
        let StudyhallClientOptions {
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                ApiError::InvalidInput(format!("Invalid Studyhall header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                ApiError::InvalidInput(format!(
                    "Invalid Studyhall header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

impl Default for StudyhallClient {
    fn default() -> Self {
        Self::new(StudyhallClientOptions::default())
    }
}

#[async_trait::async_trait]
impl TaskApi for StudyhallClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "game_status",
            Some(("task_id", task_id)),
            || async {
                let url = format!(
                    "{}/game/status/{}",
                    self.base_url,
                    urlencoding::encode(task_id)
                );
                client_utils::get_json(&self.client, &url, self.request_headers()?).await
            },
        )
        .await
    }

    async fn launch(&self, task_id: &str) -> ApiResult<()> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "game_launch",
            Some(("task_id", task_id)),
            || async {
                let url = format!(
                    "{}/game/launch/{}",
                    self.base_url,
                    urlencoding::encode(task_id)
                );
                let _: Value =
                    client_utils::post_empty(&self.client, &url, self.request_headers()?).await?;
                Ok(())
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl StudyApi for StudyhallClient {
    async fn upload_pdf(&self, file_name: &str, data: Vec<u8>) -> ApiResult<UploadReceipt> {
        crate::opentelemetry::trace_request(self.provider(), "upload_pdf", None, || async {
            if !file_name.to_lowercase().ends_with(".pdf") {
                return Err(ApiError::InvalidInput(
                    "Please upload a PDF file.".to_string(),
                ));
            }

            let file = Part::bytes(data)
                .file_name(file_name.to_string())
                .mime_str("application/pdf")?;
            let form = Form::new().part("file", file);

            let url = format!("{}/upload_pdf", self.base_url);
            client_utils::send_multipart(&self.client, &url, form, self.request_headers()?).await
        })
        .await
    }

    async fn generate_video(&self, document_id: &str) -> ApiResult<VideoArtifact> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "generate_video",
            Some(("document_id", document_id)),
            || async {
                let url = format!(
                    "{}/generate_video/{}",
                    self.base_url,
                    urlencoding::encode(document_id)
                );
                client_utils::post_empty(&self.client, &url, self.request_headers()?).await
            },
        )
        .await
    }

    async fn generate_game(&self, document_id: &str) -> ApiResult<GameTicket> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "generate_game",
            Some(("document_id", document_id)),
            || async {
                let url = format!(
                    "{}/game/generate/{}",
                    self.base_url,
                    urlencoding::encode(document_id)
                );
                let ticket: GameTicket =
                    client_utils::post_empty(&self.client, &url, self.request_headers()?).await?;

                if ticket.task_id.is_empty() {
                    return Err(ApiError::Invariant(
                        PROVIDER,
                        "No game task id returned by backend.".to_string(),
                    ));
                }

                Ok(ticket)
            },
        )
        .await
    }

    async fn summary(&self, request: NotesRequest) -> ApiResult<Value> {
        crate::opentelemetry::trace_request(self.provider(), "summary", None, || async {
            let url = format!("{}/notes/summary", self.base_url);
            client_utils::send_json(&self.client, &url, &request, self.request_headers()?).await
        })
        .await
    }

    async fn notes(&self, request: NotesRequest) -> ApiResult<Value> {
        crate::opentelemetry::trace_request(self.provider(), "notes", None, || async {
            let url = format!("{}/notes", self.base_url);
            client_utils::send_json(&self.client, &url, &request, self.request_headers()?).await
        })
        .await
    }

    async fn chat(&self, request: ChatRequest) -> ApiResult<ChatReply> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "chat",
            request
                .document_id
                .as_deref()
                .map(|id| ("document_id", id)),
            || async {
                let url = format!("{}/chat", self.base_url);
                client_utils::send_json(&self.client, &url, &request, self.request_headers()?).await
            },
        )
        .await
    }
}
