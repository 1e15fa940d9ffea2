use study_sdk::{engine::*, *};

#[tokio::test]
async fn generate_rejects_blank_study_notes_before_sending() {
    let engine = GameEngineClient::default();

    for notes in ["", "   \n\t"] {
        let err = engine
            .generate(notes)
            .await
            .expect_err("blank notes should be rejected");

        match err {
            ApiError::InvalidInput(message) => {
                assert_eq!(message, "Please enter some study notes first!");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}

#[tokio::test]
async fn generate_sends_nonblank_notes_to_the_engine() {
    // An unroutable port keeps the request local. Reaching the transport
    // layer at all means the notes check passed.
    let engine = GameEngineClient::new(GameEngineClientOptions {
        base_url: Some("http://127.0.0.1:1".to_string()),
        ..Default::default()
    });

    let err = engine
        .generate("Photosynthesis converts light into chemical energy.")
        .await
        .expect_err("nothing is listening on the test port");

    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn history_entries_tolerate_sparse_records() {
    let history: Vec<TaskHistoryEntry> = serde_json::from_value(serde_json::json!([
        {
            "task_id": "task-9",
            "status": "completed",
            "phase": "Complete",
            "created_at": "2025-06-01T10:00:00",
            "completed_at": "2025-06-01T10:04:12"
        },
        { "task_id": "task-8" }
    ]))
    .unwrap();

    assert_eq!(history[0].status, TaskStatus::Completed);
    assert_eq!(
        history[0].completed_at.as_deref(),
        Some("2025-06-01T10:04:12")
    );
    assert_eq!(history[1].status, TaskStatus::Queued);
    assert_eq!(history[1].phase, None);
    assert_eq!(history[1].created_at, None);
}
