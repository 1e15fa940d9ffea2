use crate::opentelemetry::FlowSpan;
use futures::Stream;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use study_sdk::{GameTicket, TaskApi, TaskSnapshot, TaskStatus};
use tokio::{sync::watch, task::JoinHandle};
use tracing_futures::Instrument;

/// Client-owned state for one game-generation job, updated by poll
/// absorption and launch transitions only. Identity is the task id.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTask {
    pub task_id: String,
    pub status: TaskStatus,
    pub phase: Option<String>,
    /// Failure reported by the pipeline, distinct from `launch_error`.
    pub error: Option<String>,
    pub game_design: Option<Value>,
    pub level_design: Option<Value>,
    pub code: Option<String>,
    pub game_file: Option<String>,
    /// A launch request is in flight.
    pub launching: bool,
    pub launch_error: Option<String>,
    launch_triggered: bool,
}

/// Outcome of absorbing one status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Keep polling.
    Continue,
    /// A terminal status was just absorbed; polling stops.
    Terminal,
    /// The task was already terminal; the snapshot was dropped.
    Ignored,
}

impl GameTask {
    #[must_use]
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::default(),
            phase: None,
            error: None,
            game_design: None,
            level_design: None,
            code: None,
            game_file: None,
            launching: false,
            launch_error: None,
            launch_triggered: false,
        }
    }

    /// State right after a creation ticket, before the first poll lands.
    #[must_use]
    pub fn from_ticket(ticket: &GameTicket) -> Self {
        let mut task = Self::new(ticket.task_id.clone());
        task.status = ticket.status.clone().unwrap_or_default();
        task.phase = Some("Game Design (1/3)".to_string());
        task
    }

    /// Overwrite the job state with a fresh snapshot. Once a terminal status
    /// has been absorbed, later snapshots mutate nothing.
    pub fn absorb(&mut self, snapshot: &TaskSnapshot) -> PollStep {
        if self.status.is_terminal() {
            return PollStep::Ignored;
        }

        self.status = snapshot.status.clone();
        self.phase = snapshot.phase.clone();
        self.error = snapshot.error.clone();
        self.game_design = snapshot.game_design.clone();
        self.level_design = snapshot.level_design.clone();
        self.code = snapshot.code.clone();
        self.game_file = snapshot.game_file.clone();

        if self.status.is_terminal() {
            PollStep::Terminal
        } else {
            PollStep::Continue
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    /// Text for a failed job: the pipeline's own error when it reported one.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        if self.status != TaskStatus::Failed {
            return None;
        }
        Some(
            self.error
                .clone()
                .unwrap_or_else(|| "Game generation failed.".to_string()),
        )
    }

    /// One-shot latch for the automatic launch. Trips on the first call
    /// after the job completes; every later call returns false.
    pub(crate) fn begin_auto_launch(&mut self) -> bool {
        if self.status == TaskStatus::Completed && !self.launch_triggered {
            self.launch_triggered = true;
            self.launching = true;
            true
        } else {
            false
        }
    }
}

/// Polls one job until a terminal status is absorbed, publishing every
/// state change on a watch channel. Dropping the poller aborts the loop.
pub struct TaskPoller {
    api: Arc<dyn TaskApi>,
    task_id: String,
    state: Arc<watch::Sender<GameTask>>,
    handle: JoinHandle<()>,
}

impl TaskPoller {
    /// Spawn the poll loop: one fetch immediately, then one per interval.
    /// With `auto_launch`, the first completion triggers a launch exactly
    /// once.
    #[must_use]
    pub fn spawn(
        api: Arc<dyn TaskApi>,
        task: GameTask,
        interval: Duration,
        auto_launch: bool,
    ) -> Self {
        let task_id = task.task_id.clone();
        let state = Arc::new(watch::channel(task).0);
        let span = FlowSpan::new("poll_task", Some(("task_id", &task_id))).span();
        let handle = tokio::spawn(
            poll_task(
                api.clone(),
                task_id.clone(),
                state.clone(),
                interval,
                auto_launch,
            )
            .instrument(span),
        );
        Self {
            api,
            task_id,
            state,
            handle,
        }
    }

    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// The current task state.
    #[must_use]
    pub fn snapshot(&self) -> GameTask {
        self.state.borrow().clone()
    }

    /// A receiver over the task state, for callers that await changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GameTask> {
        self.state.subscribe()
    }

    /// Stream of task states, starting from the current one. Ends when the
    /// poller is dropped.
    pub fn updates(&self) -> impl Stream<Item = GameTask> + Send + 'static {
        let mut receiver = self.state.subscribe();
        async_stream::stream! {
            let current = receiver.borrow_and_update().clone();
            yield current;
            while receiver.changed().await.is_ok() {
                let current = receiver.borrow_and_update().clone();
                yield current;
            }
        }
    }

    /// Launch the generated game. A no-op unless the job has completed and
    /// no other launch is in flight; a failure sets `launch_error` and never
    /// reverts the job status.
    pub async fn launch(&self) {
        let begun = self.state.send_if_modified(|task| {
            if task.status == TaskStatus::Completed && !task.launching {
                task.launching = true;
                task.launch_error = None;
                true
            } else {
                false
            }
        });
        if !begun {
            return;
        }

        let outcome = self.api.launch(&self.task_id).await;
        if let Err(error) = &outcome {
            tracing::warn!(task_id = %self.task_id, error = %error, "game launch failed");
        }
        self.state.send_modify(|task| {
            task.launching = false;
            if let Err(error) = outcome {
                task.launch_error = Some(
                    error
                        .backend_detail()
                        .unwrap_or_else(|| "Game launch failed.".to_string()),
                );
            }
        });
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn poll_task(
    api: Arc<dyn TaskApi>,
    task_id: String,
    state: Arc<watch::Sender<GameTask>>,
    interval: Duration,
    auto_launch: bool,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let snapshot = match api.fetch_status(&task_id).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                // A dropped poll keeps the last known state and the loop.
                tracing::warn!(task_id = %task_id, error = %error, "game status poll failed");
                continue;
            }
        };

        let mut step = PollStep::Continue;
        state.send_modify(|task| step = task.absorb(&snapshot));
        if step != PollStep::Continue {
            break;
        }
    }

    if auto_launch && state.send_if_modified(GameTask::begin_auto_launch) {
        let outcome = api.launch(&task_id).await;
        if let Err(error) = &outcome {
            tracing::warn!(task_id = %task_id, error = %error, "game auto-launch failed");
        }
        state.send_modify(|task| {
            task.launching = false;
            if outcome.is_err() {
                task.launch_error =
                    Some("Game generated, but auto-launch failed. Try Launch Game.".to_string());
            }
        });
    }
}
