mod common;

use dotenvy::dotenv;
use futures::StreamExt;
use std::{env, error::Error, pin::pin, sync::Arc, time::Duration};
use study_desk::{phase_states, render_progress, GameTask, PhaseState, TaskPoller, PHASE_LABELS};
use study_sdk::{TaskApi, TaskStatus};

fn show_result(task: &GameTask) {
    for (label, state) in PHASE_LABELS.iter().zip(phase_states(&task.status)) {
        let mark = match state {
            PhaseState::Done => "x",
            PhaseState::Active => ">",
            PhaseState::Pending => " ",
        };
        println!("[{mark}] {label}");
    }

    if let Some(message) = task.failure_message() {
        println!("{message}");
        return;
    }
    if let Some(design) = &task.game_design {
        println!(
            "--- Game design ---\n{}",
            serde_json::to_string_pretty(design).unwrap_or_default()
        );
    }
    if let Some(levels) = &task.level_design {
        println!(
            "--- Level design ---\n{}",
            serde_json::to_string_pretty(levels).unwrap_or_default()
        );
    }
    if let Some(code) = &task.code {
        println!("--- Code ({} bytes) ---", code.len());
    }
    if let Some(file) = &task.game_file {
        println!("Game file: {file}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let study_notes = env::args().skip(1).collect::<Vec<_>>().join(" ");

    let engine = Arc::new(common::engine_client());
    let ticket = engine.generate(&study_notes).await?;
    println!("Started task {}", ticket.task_id);

    let api: Arc<dyn TaskApi> = engine.clone();
    let poller = TaskPoller::spawn(
        api,
        GameTask::new(&ticket.task_id),
        Duration::from_secs(2),
        false,
    );

    let mut updates = pin!(poller.updates());
    let mut last_line = String::new();
    while let Some(task) = updates.next().await {
        let line = render_progress(&task);
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
        if task.is_terminal() {
            show_result(&task);
            break;
        }
    }

    if poller.snapshot().status == TaskStatus::Completed {
        poller.launch().await;
        match poller.snapshot().launch_error {
            Some(error) => println!("Failed to launch: {error}"),
            None => println!("Game launched! Check your screen for the PyGame window."),
        }
    }

    println!("--- Recent jobs ---");
    for entry in engine.history().await? {
        println!(
            "{}  {:?}  {}",
            entry.task_id,
            entry.status,
            entry.created_at.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
