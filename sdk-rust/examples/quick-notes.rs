use dotenvy::dotenv;
use study_sdk::{normalize_insight, InsightView, NotesRequest, StudyApi};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        "Photosynthesis turns light, water and carbon dioxide into glucose and oxygen."
            .to_string()
    } else {
        args.join(" ")
    };

    let client = common::studyhall_client();
    let payload = client.notes(NotesRequest::for_text(text)).await.unwrap();

    match normalize_insight(&payload) {
        InsightView::Study(notes) => {
            for card in &notes.flashcards {
                println!("Q: {}", card.question);
                println!("A: {}", card.answer);
                println!();
            }
            if !notes.cheat_sheet.trim().is_empty() {
                println!("Cheat sheet:\n{}\n", notes.cheat_sheet);
            }
            for mcq in &notes.mcqs {
                println!("{}", mcq.question);
                for option in &mcq.options {
                    let marker = if mcq.is_answer(option) { "*" } else { "-" };
                    println!("  {marker} {option}");
                }
                println!();
            }
            for (index, question) in notes.interview_questions.iter().enumerate() {
                println!("Interview Q{}: {question}", index + 1);
            }
        }
        InsightView::Markdown(text) | InsightView::Text(text) | InsightView::Dump(text) => {
            println!("{text}");
        }
        InsightView::Bullets(items) => {
            for item in items {
                println!("- {item}");
            }
        }
        InsightView::Empty => println!("No notes produced."),
    }
}
