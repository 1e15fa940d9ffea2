use async_trait::async_trait;
use futures::StreamExt;
use std::{pin::pin, sync::Arc, time::Duration};
use study_desk::{GameTask, PollStep, TaskPoller};
use study_sdk::{
    study_sdk_test::MockStudyApi, ApiError, ApiResult, GameTicket, TaskApi, TaskSnapshot,
    TaskStatus,
};
use tokio::sync::watch;

const POLL: Duration = Duration::from_millis(10);

/// Stands in for any transport failure since the poller treats all API
/// errors alike.
fn api_error<T>() -> ApiResult<T> {
    Err(ApiError::InvalidInput("backend unreachable".to_string()))
}

fn snapshot(status: TaskStatus) -> TaskSnapshot {
    TaskSnapshot {
        status,
        ..Default::default()
    }
}

fn completed_task(task_id: &str) -> GameTask {
    let mut task = GameTask::new(task_id);
    task.status = TaskStatus::Completed;
    task
}

async fn wait_for(
    receiver: &mut watch::Receiver<GameTask>,
    mut predicate: impl FnMut(&GameTask) -> bool,
) -> GameTask {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let current = receiver.borrow_and_update().clone();
            if predicate(&current) {
                return current;
            }
            receiver.changed().await.expect("poller state closed");
        }
    })
    .await
    .expect("timed out waiting for task state")
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}

/// Forwards to the mock but keeps the launch in flight for a while, so
/// overlapping launch calls can be observed.
struct SlowLaunchApi {
    inner: Arc<MockStudyApi>,
    launch_delay: Duration,
}

#[async_trait]
impl TaskApi for SlowLaunchApi {
    fn provider(&self) -> &'static str {
        self.inner.provider()
    }

    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        self.inner.fetch_status(task_id).await
    }

    async fn launch(&self, task_id: &str) -> ApiResult<()> {
        tokio::time::sleep(self.launch_delay).await;
        self.inner.launch(task_id).await
    }
}

#[test]
fn absorb_tracks_pipeline_progression() {
    let mut task = GameTask::new("task-1");
    assert_eq!(task.status, TaskStatus::Queued);
    assert_eq!(task.progress_percent(), 0);

    assert_eq!(
        task.absorb(&snapshot(TaskStatus::GeneratingDesign)),
        PollStep::Continue
    );
    assert_eq!(task.progress_percent(), 33);

    assert_eq!(
        task.absorb(&snapshot(TaskStatus::GeneratingLevels)),
        PollStep::Continue
    );
    assert_eq!(task.progress_percent(), 66);

    assert_eq!(
        task.absorb(&snapshot(TaskStatus::GeneratingCode)),
        PollStep::Continue
    );
    assert_eq!(task.progress_percent(), 90);

    assert_eq!(
        task.absorb(&snapshot(TaskStatus::Completed)),
        PollStep::Terminal
    );
    assert_eq!(task.progress_percent(), 100);
    assert!(task.is_terminal());
}

#[test]
fn absorb_overwrites_phase_and_artifacts_from_each_snapshot() {
    let mut task = GameTask::new("task-1");

    let mut full = snapshot(TaskStatus::GeneratingLevels);
    full.phase = Some("Level Design (2/3)".to_string());
    full.game_design = Some(serde_json::json!({ "title": "Quiz Dash" }));
    assert_eq!(task.absorb(&full), PollStep::Continue);
    assert_eq!(task.phase.as_deref(), Some("Level Design (2/3)"));
    assert!(task.game_design.is_some());

    // A snapshot without those fields clears them.
    assert_eq!(
        task.absorb(&snapshot(TaskStatus::GeneratingCode)),
        PollStep::Continue
    );
    assert_eq!(task.phase, None);
    assert_eq!(task.game_design, None);
}

#[test]
fn absorb_ignores_snapshots_after_terminal() {
    let mut task = GameTask::new("task-1");

    let mut failed = snapshot(TaskStatus::Failed);
    failed.error = Some("design model unavailable".to_string());
    assert_eq!(task.absorb(&failed), PollStep::Terminal);

    let mut late = snapshot(TaskStatus::Completed);
    late.code = Some("print('hi')".to_string());
    assert_eq!(task.absorb(&late), PollStep::Ignored);

    assert_eq!(task.status, TaskStatus::Failed);
    assert_eq!(task.error.as_deref(), Some("design model unavailable"));
    assert_eq!(task.code, None);
}

#[test]
fn from_ticket_seeds_queued_state_with_first_phase() {
    let ticket = GameTicket {
        task_id: "task-9".to_string(),
        status: None,
        document_id: Some("doc-1".to_string()),
    };

    let task = GameTask::from_ticket(&ticket);
    assert_eq!(task.task_id, "task-9");
    assert_eq!(task.status, TaskStatus::Queued);
    assert_eq!(task.phase.as_deref(), Some("Game Design (1/3)"));
    assert!(!task.launching);
    assert_eq!(task.launch_error, None);
}

#[test]
fn failure_message_prefers_backend_error() {
    let mut task = GameTask::new("task-1");
    assert_eq!(task.failure_message(), None);

    let mut failed = snapshot(TaskStatus::Failed);
    failed.error = Some("code stage crashed".to_string());
    task.absorb(&failed);
    assert_eq!(task.failure_message().as_deref(), Some("code stage crashed"));

    let mut bare = GameTask::new("task-2");
    bare.absorb(&snapshot(TaskStatus::Failed));
    assert_eq!(
        bare.failure_message().as_deref(),
        Some("Game generation failed.")
    );
}

#[tokio::test]
async fn poller_polls_until_terminal_and_stops() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::GeneratingDesign))
        .enqueue_status(snapshot(TaskStatus::GeneratingCode))
        .enqueue_status(snapshot(TaskStatus::Completed));

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, false);
    let mut state = poller.subscribe();

    let task = wait_for(&mut state, |task| task.status == TaskStatus::Completed).await;
    assert!(task.is_terminal());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let polls = api.tracked_status_inputs();
    assert_eq!(polls.len(), 3);
    assert!(polls.iter().all(|id| id == "task-1"));
    assert!(api.tracked_launch_inputs().is_empty());
}

#[tokio::test]
async fn poller_keeps_polling_after_a_failed_poll() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(api_error())
        .enqueue_status(snapshot(TaskStatus::Completed));

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, false);
    let mut state = poller.subscribe();

    let task = wait_for(&mut state, |task| task.status == TaskStatus::Completed).await;
    assert_eq!(task.error, None);
    assert_eq!(api.tracked_status_inputs().len(), 2);
}

#[tokio::test]
async fn auto_launch_fires_exactly_once_after_completion() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::GeneratingDesign))
        .enqueue_status(snapshot(TaskStatus::Completed))
        .enqueue_launch(());

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, true);

    wait_until(|| api.tracked_launch_inputs().len() == 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(api.tracked_launch_inputs(), vec!["task-1".to_string()]);
    let task = poller.snapshot();
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(!task.launching);
    assert_eq!(task.launch_error, None);
}

#[tokio::test]
async fn auto_launch_failure_sets_launch_error_and_keeps_status() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::Completed))
        .enqueue_launch(api_error());

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, true);

    wait_until(|| api.tracked_launch_inputs().len() == 1).await;
    let mut state = poller.subscribe();
    let task = wait_for(&mut state, |task| task.launch_error.is_some()).await;

    assert_eq!(
        task.launch_error.as_deref(),
        Some("Game generated, but auto-launch failed. Try Launch Game.")
    );
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(!task.launching);
}

#[tokio::test]
async fn auto_launch_is_skipped_for_failed_jobs() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::Failed));

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, true);
    let mut state = poller.subscribe();

    wait_for(&mut state, |task| task.status == TaskStatus::Failed).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(api.tracked_launch_inputs().is_empty());
}

#[tokio::test]
async fn manual_launch_is_ignored_before_completion() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::GeneratingDesign));

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, false);
    let mut state = poller.subscribe();
    wait_for(&mut state, |task| {
        task.status == TaskStatus::GeneratingDesign
    })
    .await;

    poller.launch().await;

    assert!(api.tracked_launch_inputs().is_empty());
    assert!(!poller.snapshot().launching);
}

#[tokio::test]
async fn manual_launch_failure_sets_fallback_error() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::Completed))
        .enqueue_launch(api_error());

    let poller = TaskPoller::spawn(api.clone(), completed_task("task-1"), POLL, false);

    poller.launch().await;

    let task = poller.snapshot();
    assert_eq!(task.launch_error.as_deref(), Some("Game launch failed."));
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(api.tracked_launch_inputs().len(), 1);
}

#[tokio::test]
async fn manual_launch_clears_previous_launch_error() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::Completed))
        .enqueue_launch(api_error())
        .enqueue_launch(());

    let poller = TaskPoller::spawn(api.clone(), completed_task("task-1"), POLL, false);

    poller.launch().await;
    assert!(poller.snapshot().launch_error.is_some());

    poller.launch().await;
    assert_eq!(poller.snapshot().launch_error, None);
    assert_eq!(api.tracked_launch_inputs().len(), 2);
}

#[tokio::test]
async fn overlapping_launches_collapse_to_one_request() {
    let inner = Arc::new(MockStudyApi::new());
    inner
        .enqueue_status(snapshot(TaskStatus::Completed))
        .enqueue_launch(());
    let api = Arc::new(SlowLaunchApi {
        inner: inner.clone(),
        launch_delay: Duration::from_millis(50),
    });

    let poller = TaskPoller::spawn(api, completed_task("task-1"), POLL, false);

    tokio::join!(poller.launch(), poller.launch());

    assert_eq!(inner.tracked_launch_inputs().len(), 1);
    let task = poller.snapshot();
    assert!(!task.launching);
    assert_eq!(task.launch_error, None);
}

#[tokio::test]
async fn updates_stream_starts_at_current_state_and_follows_changes() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_status(snapshot(TaskStatus::GeneratingDesign))
        .enqueue_status(snapshot(TaskStatus::Completed));

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, false);

    let mut updates = pin!(poller.updates());
    let mut seen = Vec::new();
    while let Some(task) = updates.next().await {
        let terminal = task.is_terminal();
        seen.push(task.status.clone());
        if terminal {
            break;
        }
    }

    assert_eq!(seen.first(), Some(&TaskStatus::Queued));
    assert_eq!(seen.last(), Some(&TaskStatus::Completed));
}

#[tokio::test]
async fn dropping_the_poller_stops_the_loop() {
    let api = Arc::new(MockStudyApi::new());
    for _ in 0..100 {
        api.enqueue_status(snapshot(TaskStatus::GeneratingDesign));
    }

    let poller = TaskPoller::spawn(api.clone(), GameTask::new("task-1"), POLL, false);
    wait_until(|| !api.tracked_status_inputs().is_empty()).await;

    drop(poller);
    tokio::time::sleep(Duration::from_millis(30)).await;
    let after_drop = api.tracked_status_inputs().len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(api.tracked_status_inputs().len(), after_drop);
}
