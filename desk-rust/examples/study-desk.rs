mod common;

use dotenvy::dotenv;
use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use std::{env, error::Error, sync::Arc, time::Duration};
use study_desk::{render_progress, Desk, NotesDisplay, Panel};
use study_sdk::{ChatMessage, InsightView, TaskStatus};
use tracing::Level;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;

fn init_tracing() -> Result<SdkTracerProvider, Box<dyn Error>> {
    let exporter = SpanExporter::builder().with_http().build()?;

    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_attribute(KeyValue::new("service.name", "study-desk-example"))
                .build(),
        )
        .build();

    let tracer = provider.tracer("study-desk.examples.study-desk");

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            Level::INFO,
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(OpenTelemetryLayer::new(tracer));

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(provider)
}

fn print_insight(label: &str, panel: &Panel<InsightView>) {
    println!("--- {label} ---");
    if let Some(error) = &panel.error {
        println!("{error}");
        return;
    }
    match &panel.value {
        Some(InsightView::Markdown(text) | InsightView::Text(text)) => println!("{text}"),
        Some(InsightView::Bullets(items)) => {
            for item in items {
                println!("- {item}");
            }
        }
        Some(InsightView::Study(notes)) => {
            println!("{}", NotesDisplay::revealed().render(notes));
        }
        Some(InsightView::Dump(json)) => println!("{json}"),
        Some(InsightView::Empty) | None => println!("(nothing yet)"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let provider = init_tracing()?;

    let path = env::args()
        .nth(1)
        .ok_or("usage: study-desk <path-to-pdf>")?;
    let data = tokio::fs::read(&path).await?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let desk = Desk::builder(Arc::new(common::studyhall_client()))
        .media_base_url(common::studyhall_base_url())
        .build();

    let receipt = desk.upload_pdf(&file_name, data).await?;
    println!(
        "Uploaded {} as document {} ({} chunks)",
        file_name,
        receipt.document_id,
        receipt.chunks.unwrap_or_default()
    );

    let session = desk
        .open_document(receipt.document_id.clone())
        .expect("document was just uploaded");

    let mut summary = session.watch_summary();
    while !summary.borrow_and_update().is_settled() {
        summary.changed().await?;
    }
    let mut notes = session.watch_notes();
    while !notes.borrow_and_update().is_settled() {
        notes.changed().await?;
    }
    print_insight("Summary", &session.summary());
    print_insight("Quick notes", &session.notes());

    let mut video = session.watch_video();
    while !video.borrow_and_update().is_settled() {
        video.changed().await?;
    }
    match session.video_url() {
        Some(url) => println!("Video ready: {url}"),
        None => {
            if let Some(error) = session.video().error {
                println!("Video: {error}");
            }
        }
    }

    // Follow the game job until it settles. Completion launches the game
    // automatically.
    let mut game = session.watch_game();
    loop {
        let panel = game.borrow_and_update().clone();
        if let Some(error) = &panel.error {
            println!("Game: {error}");
            break;
        }
        if let Some(task) = &panel.value {
            println!("{}", render_progress(task));
            if task.status == TaskStatus::Failed {
                if let Some(message) = task.failure_message() {
                    println!("Game: {message}");
                }
                break;
            }
            if task.status == TaskStatus::Completed {
                break;
            }
        }
        game.changed().await?;
    }

    // Give the automatic launch a moment to settle before reading it.
    tokio::time::sleep(Duration::from_secs(1)).await;
    if let Some(task) = session.game().value {
        if let Some(error) = &task.launch_error {
            println!("Game: {error}");
        } else if task.status == TaskStatus::Completed {
            println!("Game launched.");
        }
    }

    let mut chat = session.chat();
    if let Some(ChatMessage::Assistant(message)) = chat
        .send("Give me a two-line overview of this document.")
        .await
    {
        println!("assistant: {}", message.content);
        for image in message.images.iter().flatten() {
            println!("  image: {}", chat.image_url(image));
        }
    }

    provider.force_flush().ok();

    drop(provider); // ensure all spans are exported before exit

    Ok(())
}
