use crate::{client_utils, ApiError, ApiResult, GameTicket, TaskApi, TaskHistoryEntry, TaskSnapshot};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const PROVIDER: &str = "game_engine";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client for talking to the game engine directly, without going through a
/// Studyhall backend. The engine takes raw study notes instead of an
/// ingested document.
pub struct GameEngineClient {
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GameEngineClientOptions {
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

#[derive(Serialize)]
struct GameRequest {
    study_notes: String,
}

impl GameEngineClient {
    #[must_use]
    pub fn new(options: GameEngineClientOptions) -> Self {
        let GameEngineClientOptions {
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

    /// Start a game generation job from raw study notes.
    pub async fn generate(&self, study_notes: impl Into<String>) -> ApiResult<GameTicket> {
        let study_notes = study_notes.into();

        crate::opentelemetry::trace_request(PROVIDER, "generate", None, || async {
            if study_notes.trim().is_empty() {
                return Err(ApiError::InvalidInput(
                    "Please enter some study notes first!".to_string(),
                ));
            }

            let url = format!("{}/api/generate", self.base_url);
            let request = GameRequest { study_notes };
            let ticket: GameTicket =
                client_utils::send_json(&self.client, &url, &request, self.request_headers()?)
                    .await?;

            if ticket.task_id.is_empty() {
                return Err(ApiError::Invariant(
                    PROVIDER,
                    "No game task id returned by backend.".to_string(),
                ));
            }

            Ok(ticket)
        })
        .await
    }

    /// The last ten jobs the engine has run, newest first.
    pub async fn history(&self) -> ApiResult<Vec<TaskHistoryEntry>> {
        crate::opentelemetry::trace_request(PROVIDER, "history", None, || async {
            let url = format!("{}/api/history", self.base_url);
            client_utils::get_json(&self.client, &url, self.request_headers()?).await
        })
        .await
    }

    fn request_headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                ApiError::InvalidInput(format!("Invalid engine header name '{key}': {error}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                ApiError::InvalidInput(format!("Invalid engine header value for '{key}': {error}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

impl Default for GameEngineClient {
    fn default() -> Self {
        Self::new(GameEngineClientOptions::default())
    }
}

#[async_trait::async_trait]
impl TaskApi for GameEngineClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        crate::opentelemetry::trace_request(
            self.provider(),
            "status",
            Some(("task_id", task_id)),
            || async {
                let url = format!(
                    "{}/api/status/{}",
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
            "launch",
            Some(("task_id", task_id)),
            || async {
                let url = format!(
                    "{}/api/launch/{}",
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
