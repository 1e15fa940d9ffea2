use dotenvy::dotenv;
use study_sdk::StudyApi;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .expect("usage: upload-pdf <file.pdf>");
    let data = tokio::fs::read(&path).await.expect("failed to read the PDF");
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());

    let client = common::studyhall_client();
    let receipt = client.upload_pdf(&file_name, data).await.unwrap();

    println!("{receipt:#?}");
    if receipt.is_processed() {
        println!("Document id: {}", receipt.document_id);
    }
}
