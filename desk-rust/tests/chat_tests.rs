use std::sync::Arc;
use study_desk::Desk;
use study_sdk::{
    study_sdk_test::MockStudyApi, ApiError, ApiResult, ChatImage, ChatMessage, ChatReply,
};

const GREETING: &str = "Ask me anything about this document.";

fn api_error<T>() -> ApiResult<T> {
    Err(ApiError::InvalidInput("backend unreachable".to_string()))
}

fn reply(answer: &str) -> ChatReply {
    ChatReply {
        answer: answer.to_string(),
        ..Default::default()
    }
}

fn desk(api: &Arc<MockStudyApi>) -> Desk {
    Desk::builder(api.clone()).build()
}

#[tokio::test]
async fn chat_starts_with_the_assistant_greeting() {
    let api = Arc::new(MockStudyApi::new());
    let chat = desk(&api).chat();

    assert_eq!(chat.document_id(), None);
    assert_eq!(chat.messages(), [ChatMessage::assistant(GREETING)]);
}

#[tokio::test]
async fn send_appends_user_and_assistant_turns() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(reply("Paris."));

    let desk = desk(&api);
    let mut chat = desk.chat();
    let answer = chat.send("What is the capital?").await;

    assert_eq!(answer, Some(ChatMessage::assistant("Paris.")));
    assert_eq!(
        chat.messages(),
        [
            ChatMessage::assistant(GREETING),
            ChatMessage::user("What is the capital?"),
            ChatMessage::assistant("Paris."),
        ]
    );

    let requests = api.tracked_chat_inputs();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document_id, None);
    assert_eq!(
        requests[0].messages,
        [
            ChatMessage::assistant(GREETING),
            ChatMessage::user("What is the capital?"),
        ]
    );
}

#[tokio::test]
async fn blank_input_is_dropped_without_a_request() {
    let api = Arc::new(MockStudyApi::new());
    let mut chat = desk(&api).chat();

    assert_eq!(chat.send("   ").await, None);
    assert_eq!(chat.messages().len(), 1);
    assert!(api.tracked_chat_inputs().is_empty());
}

#[tokio::test]
async fn input_is_sent_verbatim_once_past_the_blank_check() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(reply("Noted."));

    let mut chat = desk(&api).chat();
    chat.send("  keep my spacing  ").await;

    let requests = api.tracked_chat_inputs();
    assert_eq!(
        requests[0].messages[1],
        ChatMessage::user("  keep my spacing  ")
    );
}

#[tokio::test]
async fn empty_answer_falls_back_to_an_apology() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(reply(""));

    let mut chat = desk(&api).chat();
    let answer = chat.send("Anything?").await;

    assert_eq!(
        answer,
        Some(ChatMessage::assistant("Sorry, I could not get a response."))
    );
}

#[tokio::test]
async fn request_failures_append_an_apology_and_stay_in_history() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(api_error()).enqueue_chat(reply("Better."));

    let mut chat = desk(&api).chat();
    let answer = chat.send("First try?").await;
    assert_eq!(
        answer,
        Some(ChatMessage::assistant("Sorry, something went wrong."))
    );

    chat.send("Second try?").await;

    let requests = api.tracked_chat_inputs();
    assert_eq!(requests.len(), 2);
    // The retry carries the failed exchange in its history.
    assert_eq!(requests[1].messages.len(), 4);
    assert_eq!(
        requests[1].messages[2],
        ChatMessage::assistant("Sorry, something went wrong.")
    );
}

#[tokio::test]
async fn backend_rejections_read_as_a_missing_answer() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(Err(ApiError::StatusCode(
        reqwest::StatusCode::BAD_GATEWAY,
        "upstream offline".to_string(),
    )));

    let mut chat = desk(&api).chat();
    let answer = chat.send("Anyone home?").await;

    assert_eq!(
        answer,
        Some(ChatMessage::assistant("Sorry, I could not get a response."))
    );
}

#[tokio::test]
async fn image_attachments_survive_and_resolve_against_the_media_base() {
    let api = Arc::new(MockStudyApi::new());
    let image = ChatImage {
        path: Some("/images/page-3.png".to_string()),
        page: Some(3),
        ..Default::default()
    };
    api.enqueue_chat(ChatReply {
        answer: "See the diagram on page 3.".to_string(),
        images: vec![image.clone()],
        context: None,
    });

    let mut chat = desk(&api).chat();
    let answer = chat.send("Where is the diagram?").await;

    let Some(ChatMessage::Assistant(message)) = answer else {
        panic!("expected an assistant reply");
    };
    assert_eq!(message.images, Some(vec![image.clone()]));
    assert_eq!(
        chat.image_url(&image),
        "http://127.0.0.1:5140/images/page-3.png"
    );
}

#[tokio::test]
async fn session_chat_is_bound_to_the_document() {
    let api = Arc::new(MockStudyApi::new());
    api.enqueue_chat(reply("From the document."));

    let desk = desk(&api);
    let session = desk.open_document("doc-1").expect("first open");
    let mut chat = session.chat();

    assert_eq!(chat.document_id(), Some("doc-1"));
    chat.send("What does it say?").await;

    let requests = api.tracked_chat_inputs();
    assert_eq!(requests[0].document_id.as_deref(), Some("doc-1"));
}
