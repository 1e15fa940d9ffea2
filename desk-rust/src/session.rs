use crate::{
    chat::ChatSession,
    errors::DeskError,
    opentelemetry::FlowSpan,
    poller::{GameTask, TaskPoller},
};
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use study_sdk::{
    normalize_insight, resolve_media_url, ApiResult, InsightView, NotesRequest, StudyApi, TaskApi,
    VideoArtifact,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing_futures::Instrument;

/// Loading state of one document panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub value: Option<T>,
}

impl<T> Panel<T> {
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            error: None,
            value: None,
        }
    }

    #[must_use]
    pub fn ready(value: T) -> Self {
        Self {
            loading: false,
            error: None,
            value: Some(value),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            value: None,
        }
    }

    /// Whether the panel stopped loading, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self::loading()
    }
}

pub(crate) struct SessionParams {
    pub api: Arc<dyn StudyApi>,
    pub document_id: String,
    pub poll_interval: Duration,
    pub insights_delay: Duration,
    pub auto_launch: bool,
    pub media_base_url: String,
}

/// One opened document: the video render, the game job, and both insight
/// panes load concurrently, each behind its own watch channel. Dropping the
/// session aborts whatever is still in flight.
pub struct DeskSession {
    document_id: String,
    api: Arc<dyn StudyApi>,
    media_base_url: String,
    video: Arc<watch::Sender<Panel<VideoArtifact>>>,
    summary: Arc<watch::Sender<Panel<InsightView>>>,
    notes: Arc<watch::Sender<Panel<InsightView>>>,
    game: Arc<watch::Sender<Panel<GameTask>>>,
    poller: Arc<OnceLock<Arc<TaskPoller>>>,
    tasks: Vec<JoinHandle<()>>,
}

impl DeskSession {
    pub(crate) fn open(params: SessionParams) -> Self {
        let SessionParams {
            api,
            document_id,
            poll_interval,
            insights_delay,
            auto_launch,
            media_base_url,
        } = params;

        let video = Arc::new(watch::channel(Panel::default()).0);
        let summary = Arc::new(watch::channel(Panel::default()).0);
        let notes = Arc::new(watch::channel(Panel::default()).0);
        let game = Arc::new(watch::channel(Panel::default()).0);
        let poller = Arc::new(OnceLock::new());

        let tasks = vec![
            spawn_video(api.clone(), document_id.clone(), video.clone()),
            spawn_game(
                api.clone(),
                document_id.clone(),
                game.clone(),
                poller.clone(),
                poll_interval,
                auto_launch,
            ),
            spawn_insights(
                api.clone(),
                document_id.clone(),
                summary.clone(),
                notes.clone(),
                insights_delay,
            ),
        ];

        Self {
            document_id,
            api,
            media_base_url,
            video,
            summary,
            notes,
            game,
            poller,
            tasks,
        }
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn video(&self) -> Panel<VideoArtifact> {
        self.video.borrow().clone()
    }

    #[must_use]
    pub fn summary(&self) -> Panel<InsightView> {
        self.summary.borrow().clone()
    }

    #[must_use]
    pub fn notes(&self) -> Panel<InsightView> {
        self.notes.borrow().clone()
    }

    #[must_use]
    pub fn game(&self) -> Panel<GameTask> {
        self.game.borrow().clone()
    }

    #[must_use]
    pub fn watch_video(&self) -> watch::Receiver<Panel<VideoArtifact>> {
        self.video.subscribe()
    }

    #[must_use]
    pub fn watch_summary(&self) -> watch::Receiver<Panel<InsightView>> {
        self.summary.subscribe()
    }

    #[must_use]
    pub fn watch_notes(&self) -> watch::Receiver<Panel<InsightView>> {
        self.notes.subscribe()
    }

    #[must_use]
    pub fn watch_game(&self) -> watch::Receiver<Panel<GameTask>> {
        self.game.subscribe()
    }

    /// Resolved playback URL for the rendered video, once one exists.
    #[must_use]
    pub fn video_url(&self) -> Option<String> {
        let panel = self.video.borrow();
        let path = panel.value.as_ref()?.video_path.as_deref()?;
        if path.is_empty() {
            return None;
        }
        Some(resolve_media_url(&self.media_base_url, path))
    }

    /// Launch the finished game. A no-op until the generation job exists and
    /// has completed.
    pub async fn launch_game(&self) {
        if let Some(poller) = self.poller.get() {
            poller.launch().await;
        }
    }

    /// Start a chat conversation grounded on this document.
    #[must_use]
    pub fn chat(&self) -> ChatSession {
        ChatSession::new(
            self.api.clone(),
            Some(self.document_id.clone()),
            self.media_base_url.clone(),
        )
    }
}

impl Drop for DeskSession {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_video(
    api: Arc<dyn StudyApi>,
    document_id: String,
    panel: Arc<watch::Sender<Panel<VideoArtifact>>>,
) -> JoinHandle<()> {
    let span = FlowSpan::new("generate_video", Some(("document_id", &document_id))).span();
    tokio::spawn(
        async move {
            let next = match api.generate_video(&document_id).await {
                // The render endpoint reports failures inside success
                // responses; the artifact is kept even when `error` is set.
                Ok(artifact) => Panel {
                    loading: false,
                    error: artifact.error.clone(),
                    value: Some(artifact),
                },
                Err(error) => {
                    tracing::warn!(document_id = %document_id, error = %error, "video generation failed");
                    Panel::failed(
                        DeskError::from(error).display_message("Video generation failed."),
                    )
                }
            };
            panel.send_replace(next);
        }
        .instrument(span),
    )
}

fn spawn_game(
    api: Arc<dyn StudyApi>,
    document_id: String,
    panel: Arc<watch::Sender<Panel<GameTask>>>,
    slot: Arc<OnceLock<Arc<TaskPoller>>>,
    poll_interval: Duration,
    auto_launch: bool,
) -> JoinHandle<()> {
    let span = FlowSpan::new("generate_game", Some(("document_id", &document_id))).span();
    tokio::spawn(
        async move {
            let ticket = match api.generate_game(&document_id).await {
                Ok(ticket) => ticket,
                Err(error) => {
                    tracing::warn!(document_id = %document_id, error = %error, "game kickoff failed");
                    panel.send_replace(Panel::failed(
                        DeskError::from(error).display_message("Could not start game generation."),
                    ));
                    return;
                }
            };

            let task_api: Arc<dyn TaskApi> = api;
            let poller = Arc::new(TaskPoller::spawn(
                task_api,
                GameTask::from_ticket(&ticket),
                poll_interval,
                auto_launch,
            ));
            let mut updates = poller.subscribe();
            let _ = slot.set(poller);

            panel.send_replace(Panel::ready(updates.borrow_and_update().clone()));
            while updates.changed().await.is_ok() {
                let task = updates.borrow_and_update().clone();
                panel.send_replace(Panel::ready(task));
            }
        }
        .instrument(span),
    )
}

fn spawn_insights(
    api: Arc<dyn StudyApi>,
    document_id: String,
    summary: Arc<watch::Sender<Panel<InsightView>>>,
    notes: Arc<watch::Sender<Panel<InsightView>>>,
    delay: Duration,
) -> JoinHandle<()> {
    let span = FlowSpan::new("document_insights", Some(("document_id", &document_id))).span();
    tokio::spawn(
        async move {
            // Give the upload transaction time to settle before the heavier
            // insight requests hit the backend.
            tokio::time::sleep(delay).await;

            let (summary_result, notes_result) = tokio::join!(
                api.summary(NotesRequest::for_document(document_id.clone())),
                api.notes(NotesRequest::for_document(document_id.clone())),
            );
            summary.send_replace(insight_panel(summary_result, &document_id, "summary"));
            notes.send_replace(insight_panel(notes_result, &document_id, "notes"));
        }
        .instrument(span),
    )
}

fn insight_panel(result: ApiResult<Value>, document_id: &str, kind: &str) -> Panel<InsightView> {
    match result {
        Ok(payload) => Panel::ready(normalize_insight(&payload)),
        Err(error) => {
            tracing::warn!(document_id = %document_id, kind, error = %error, "insight request failed");
            Panel::failed("Could not load document insights. Please try again.")
        }
    }
}
