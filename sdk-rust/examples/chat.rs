use dotenvy::dotenv;
use study_sdk::{
    resolve_image_url, studyhall::DEFAULT_BASE_URL, ChatMessage, ChatRequest, StudyApi,
};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let client = common::studyhall_client();
    let base_url =
        std::env::var("STUDYHALL_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    // No document id targets the most recently uploaded document.
    let mut messages = vec![ChatMessage::user("What is this document about?")];
    let reply = client
        .chat(ChatRequest {
            messages: messages.clone(),
            document_id: None,
        })
        .await
        .unwrap();

    println!("Assistant: {}", reply.answer);
    for image in &reply.images {
        println!("  image: {}", resolve_image_url(&base_url, image));
    }

    messages.push(ChatMessage::assistant(reply.answer));
    messages.push(ChatMessage::user("Give me three key takeaways."));

    let reply = client
        .chat(ChatRequest {
            messages,
            document_id: None,
        })
        .await
        .unwrap();

    println!("Assistant: {}", reply.answer);
}
