use study_sdk::studyhall::{StudyhallClient, StudyhallClientOptions};

pub fn studyhall_client() -> StudyhallClient {
    StudyhallClient::new(StudyhallClientOptions {
        base_url: std::env::var("STUDYHALL_API_URL").ok(),
        ..Default::default()
    })
}
